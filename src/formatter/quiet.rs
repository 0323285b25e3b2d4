use std::io::Write;
use std::path::PathBuf;

use crate::diagnostic::Diagnostic;
use crate::formatter::text::TextFormatter;
use crate::formatter::Formatter;

/// Silent on a clean run, otherwise the text report.
pub struct QuietFormatter;

impl Formatter for QuietFormatter {
    fn format_to(&self, diagnostics: &[Diagnostic], files: &[PathBuf], out: &mut dyn Write) {
        if diagnostics.is_empty() {
            return;
        }
        TextFormatter.format_to(diagnostics, files, out);
    }
}
