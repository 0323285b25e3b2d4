use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::diagnostic::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocorrectMode {
    Off,
    /// `-a` / `--autocorrect`: safe corrections only.
    Safe,
    /// `-A` / `--autocorrect-all`: all corrections including unsafe.
    All,
}

#[derive(Parser, Debug, Default)]
#[command(
    name = "defparens",
    version,
    about = "Checks parentheses around Ruby method definition parameters"
)]
pub struct Args {
    /// Files or directories to lint
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_parser = ["text", "emacs", "simple", "json", "quiet", "files"])]
    pub format: String,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// List all registered cop names, one per line, then exit
    #[arg(long)]
    pub list_cops: bool,

    /// List cops that support autocorrect, one per line, then exit
    #[arg(long)]
    pub list_autocorrectable_cops: bool,

    /// Read source from stdin, use PATH for display and config matching
    #[arg(long, value_name = "PATH")]
    pub stdin: Option<PathBuf>,

    /// Minimum severity for a non-zero exit code (convention, warning, error, fatal, or C/W/E/F)
    #[arg(long, value_name = "SEVERITY", default_value = "convention")]
    pub fail_level: String,

    /// Stop after first file with offenses
    #[arg(short = 'F', long)]
    pub fail_fast: bool,

    /// Autocorrect offenses (safe cops only)
    #[arg(short = 'a', long = "autocorrect")]
    pub autocorrect: bool,

    /// Autocorrect offenses (all cops, including unsafe)
    #[arg(short = 'A', long = "autocorrect-all")]
    pub autocorrect_all: bool,

    /// Write .rubocop_todo.yml allowing every current offense
    #[arg(long)]
    pub auto_gen_config: bool,
}

impl Args {
    /// Resolve the autocorrect mode from CLI flags.
    /// `-A` takes precedence over `-a` (matching RuboCop behavior).
    pub fn autocorrect_mode(&self) -> AutocorrectMode {
        if self.autocorrect_all {
            AutocorrectMode::All
        } else if self.autocorrect {
            AutocorrectMode::Safe
        } else {
            AutocorrectMode::Off
        }
    }

    pub fn fail_level(&self) -> Result<Severity> {
        self.fail_level
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid --fail-level: {e}"))
    }
}
