pub mod cli;
pub mod config;
pub mod cop;
pub mod correction;
pub mod diagnostic;
pub mod formatter;
pub mod fs;
pub mod linter;
pub mod parse;
pub mod todo;

#[cfg(test)]
pub mod testutil;

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use cli::Args;
use config::{ResolvedConfig, load_config};
use cop::registry::CopRegistry;
use diagnostic::Severity;
use formatter::create_formatter;
use fs::discover_files;
use linter::{LintResult, lint_source, run_linter};
use parse::source::SourceFile;

/// Exit code for a clean run.
pub const EXIT_OK: i32 = 0;
/// Exit code when offenses at or above the fail level were found.
pub const EXIT_OFFENSES: i32 = 1;
/// Exit code for configuration errors and files that could not be linted.
pub const EXIT_ERROR: i32 = 2;

/// Run the linter and return the process exit code.
///
/// Configuration problems are reported on stderr and yield `EXIT_ERROR`;
/// an `Err` means something unexpected went wrong.
pub fn run(args: Args) -> Result<i32> {
    let registry = CopRegistry::default_registry();

    if args.list_cops || args.list_autocorrectable_cops {
        let mut names: Vec<&str> = registry
            .cops()
            .iter()
            .filter(|c| args.list_cops || c.supports_autocorrect())
            .map(|c| c.name())
            .collect();
        names.sort();
        for name in names {
            println!("{name}");
        }
        return Ok(EXIT_OK);
    }

    let config = match load_and_validate(&args, &registry) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return Ok(EXIT_ERROR);
        }
    };
    let fail_level = match args.fail_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("error: {e:#}");
            return Ok(EXIT_ERROR);
        }
    };

    if let Some(ref display_path) = args.stdin {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        let source = SourceFile::from_string(display_path.clone(), input);
        let result = lint_source(&source, &config, &registry, &args)?;
        report(&args, &result, std::slice::from_ref(display_path));
        if let Some(corrected) = &result.corrected_source {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "====================")?;
            stdout.write_all(corrected)?;
        }
        return Ok(exit_code(&result, fail_level));
    }

    let files = discover_files(&args.paths, &config)?;
    if args.debug {
        eprintln!("debug: {} files to lint", files.len());
        eprintln!("debug: {} cops registered", registry.cops().len());
    }

    let result = run_linter(&files, &config, &registry, &args)?;
    report(&args, &result, &files);

    if args.auto_gen_config {
        let entries = todo::build_entries(
            &registry,
            &config,
            &result.diagnostics,
            &result.style_tallies,
        );
        let contents = todo::render(&entries)?;
        let dir = match config.config_dir() {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().context("failed to resolve current directory")?,
        };
        let written = todo::write_todo(&dir, &contents)?;
        eprintln!("Created {}.", written.display());
    }

    Ok(exit_code(&result, fail_level))
}

fn load_and_validate(args: &Args, registry: &CopRegistry) -> Result<ResolvedConfig> {
    let target_dir: Option<PathBuf> = args.paths.first().map(|p| {
        if p.is_file() {
            p.parent().map(|d| d.to_path_buf()).unwrap_or_default()
        } else {
            p.clone()
        }
    });
    let config_start = std::time::Instant::now();
    let config = load_config(args.config.as_deref(), target_dir.as_deref())?;
    config.validate(registry)?;

    if args.debug {
        eprintln!("debug: config loading: {:.0?}", config_start.elapsed());
        match config.config_dir() {
            Some(dir) => eprintln!("debug: config loaded from: {}", dir.display()),
            None => eprintln!("debug: no config file found"),
        }
        eprintln!("debug: global excludes: {:?}", config.global_excludes());
    }
    Ok(config)
}

fn report(args: &Args, result: &LintResult, files: &[PathBuf]) {
    for failure in &result.failures {
        eprintln!("error: {}: {:#}", failure.path.display(), failure.error);
    }
    let formatter = create_formatter(&args.format);
    formatter.print(&result.diagnostics, files);
}

/// Per-file failures outrank offenses.
pub fn exit_code(result: &LintResult, fail_level: Severity) -> i32 {
    if !result.failures.is_empty() {
        EXIT_ERROR
    } else if result.diagnostics.iter().any(|d| d.severity >= fail_level) {
        EXIT_OFFENSES
    } else {
        EXIT_OK
    }
}
