use std::process;

use clap::Parser;

use defparens::cli::Args;

fn main() {
    let args = Args::parse();
    match defparens::run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(3);
        }
    }
}
