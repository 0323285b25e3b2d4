use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Convention,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    pub fn letter(&self) -> char {
        match self {
            Severity::Convention => 'C',
            Severity::Warning => 'W',
            Severity::Error => 'E',
            Severity::Fatal => 'F',
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    /// Accepts full names (any case) and the single-letter forms used by
    /// `--fail-level`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "convention" | "c" => Ok(Severity::Convention),
            "warning" | "w" => Ok(Severity::Warning),
            "error" | "e" => Ok(Severity::Error),
            "fatal" | "f" => Ok(Severity::Fatal),
            _ => Err(format!("unknown severity `{s}`")),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// 1-indexed line number
    pub line: usize,
    /// 0-indexed column (character offset within the line)
    pub column: usize,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub path: String,
    pub location: Location,
    pub severity: Severity,
    pub cop_name: String,
    pub message: String,
    /// Set when an autocorrection for this offense was produced.
    pub corrected: bool,
    /// The cop knows a safe edit for this offense, whether or not
    /// autocorrect was requested.
    pub correctable: bool,
}

impl Diagnostic {
    pub fn sort_key(&self) -> (&str, usize, usize) {
        (&self.path, self.location.line, self.location.column)
    }

    /// `[Corrected] `, `[Correctable] ` or nothing, ahead of the message.
    pub fn status_prefix(&self) -> &'static str {
        if self.corrected {
            "[Corrected] "
        } else if self.correctable {
            "[Correctable] "
        } else {
            ""
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}: {}{}",
            self.path,
            self.location.line,
            self.location.column,
            self.severity,
            self.cop_name,
            self.status_prefix(),
            self.message,
        )
    }
}
