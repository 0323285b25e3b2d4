use std::io::Write;
use std::path::PathBuf;

use crate::diagnostic::Diagnostic;
use crate::formatter::{Formatter, summary_line};

/// One `path:line:col: S: Cop: message` line per offense, then a summary.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_to(&self, diagnostics: &[Diagnostic], files: &[PathBuf], out: &mut dyn Write) {
        for d in diagnostics {
            let _ = writeln!(out, "{d}");
        }
        let _ = writeln!(out, "\n{}", summary_line(diagnostics, files.len()));
    }
}

/// RuboCop's `simple` layout: offenses grouped under a `== path ==` header.
pub struct SimpleFormatter;

impl Formatter for SimpleFormatter {
    fn format_to(&self, diagnostics: &[Diagnostic], files: &[PathBuf], out: &mut dyn Write) {
        let mut current: Option<&str> = None;
        for d in diagnostics {
            if current != Some(d.path.as_str()) {
                let _ = writeln!(out, "== {} ==", d.path);
                current = Some(d.path.as_str());
            }
            let _ = writeln!(
                out,
                "{}:{:>3}:{:>3}: {}: {}{}",
                d.severity,
                d.location.line,
                d.location.column,
                d.cop_name,
                d.status_prefix(),
                d.message
            );
        }
        if !diagnostics.is_empty() {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{}", summary_line(diagnostics, files.len()));
    }
}
