pub mod files;
pub mod json;
pub mod quiet;
pub mod text;

use std::io::Write;
use std::path::PathBuf;

use crate::diagnostic::Diagnostic;

pub trait Formatter {
    fn format_to(&self, diagnostics: &[Diagnostic], files: &[PathBuf], out: &mut dyn Write);

    fn print(&self, diagnostics: &[Diagnostic], files: &[PathBuf]) {
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        self.format_to(diagnostics, files, &mut lock);
    }
}

pub fn create_formatter(format: &str) -> Box<dyn Formatter> {
    match format {
        "json" => Box::new(json::JsonFormatter),
        "quiet" => Box::new(quiet::QuietFormatter),
        "files" => Box::new(files::FilesFormatter),
        "simple" => Box::new(text::SimpleFormatter),
        // "text", "emacs" and anything else
        _ => Box::new(text::TextFormatter),
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// `3 files inspected, 2 offenses detected, 1 offense corrected, 1 offense autocorrectable`
pub(crate) fn summary_line(diagnostics: &[Diagnostic], file_count: usize) -> String {
    let mut line = format!(
        "{} inspected, {} detected",
        plural(file_count, "file"),
        plural(diagnostics.len(), "offense")
    );
    let corrected = diagnostics.iter().filter(|d| d.corrected).count();
    if corrected > 0 {
        line.push_str(&format!(", {} corrected", plural(corrected, "offense")));
    }
    let correctable = diagnostics
        .iter()
        .filter(|d| d.correctable && !d.corrected)
        .count();
    if correctable > 0 {
        line.push_str(&format!(", {} autocorrectable", plural(correctable, "offense")));
    }
    line
}
