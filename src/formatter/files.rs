use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use crate::diagnostic::Diagnostic;
use crate::formatter::Formatter;

/// Each offending path once, sorted, with no summary.
pub struct FilesFormatter;

impl Formatter for FilesFormatter {
    fn format_to(&self, diagnostics: &[Diagnostic], _files: &[PathBuf], out: &mut dyn Write) {
        let paths: BTreeSet<&str> = diagnostics.iter().map(|d| d.path.as_str()).collect();
        for path in paths {
            let _ = writeln!(out, "{path}");
        }
    }
}
