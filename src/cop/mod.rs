pub mod enforced_style;
pub mod registry;
pub mod style;
pub mod walker;

use std::collections::HashMap;

use anyhow::{Result, bail};

use crate::cli::AutocorrectMode;
use crate::correction::Correction;
use crate::diagnostic::{Diagnostic, Location, Severity};
use crate::parse::source::SourceFile;

use enforced_style::StyleSample;

/// Per-cop configuration extracted from .rubocop.yml.
#[derive(Debug, Clone)]
pub struct CopConfig {
    pub enabled: bool,
    pub severity: Option<Severity>,
    pub exclude: Vec<String>,
    pub include: Vec<String>,
    pub options: HashMap<String, serde_yml::Value>,
}

impl Default for CopConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
            exclude: Vec::new(),
            include: Vec::new(),
            options: HashMap::new(),
        }
    }
}

impl CopConfig {
    /// Config with a single string option set, mostly for tests.
    pub fn with_option(key: &str, value: &str) -> Self {
        let mut config = Self::default();
        config
            .options
            .insert(key.to_string(), serde_yml::Value::String(value.to_string()));
        config
    }

    /// A string-valued option. Missing keys yield `Ok(None)`; present keys
    /// of any other YAML type are a configuration error.
    pub fn string_option(&self, key: &str) -> Result<Option<&str>> {
        match self.options.get(key) {
            None => Ok(None),
            Some(serde_yml::Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => bail!("`{key}` must be a string, got {other:?}"),
        }
    }

    /// Whether this cop may autocorrect under `mode`, honoring the per-cop
    /// `AutoCorrect` key (`false` or `disabled` turns it off).
    pub fn should_autocorrect(&self, mode: AutocorrectMode) -> bool {
        if mode == AutocorrectMode::Off {
            return false;
        }
        match self.options.get("AutoCorrect") {
            Some(serde_yml::Value::Bool(b)) => *b,
            Some(serde_yml::Value::String(s)) => s != "disabled",
            _ => true,
        }
    }
}

/// A lint rule. Implementations must be Send + Sync so they can be shared
/// across rayon worker threads.
pub trait Cop: Send + Sync {
    /// The fully-qualified cop name, e.g. "Style/MethodDefParentheses".
    fn name(&self) -> &'static str;

    fn default_severity(&self) -> Severity {
        Severity::Convention
    }

    fn supports_autocorrect(&self) -> bool {
        false
    }

    /// Reject unusable options before any file is inspected.
    #[allow(unused_variables)]
    fn validate_config(&self, config: &CopConfig) -> Result<()> {
        Ok(())
    }

    /// Node-based check, called for every AST node during traversal.
    /// `corrections` is `Some` only when autocorrect is active for this cop.
    #[allow(unused_variables)]
    fn check_node(
        &self,
        source: &SourceFile,
        node: &ruby_prism::Node<'_>,
        parse_result: &ruby_prism::ParseResult<'_>,
        config: &CopConfig,
        diagnostics: &mut Vec<Diagnostic>,
        corrections: Option<&mut Vec<Correction>>,
    ) {
    }

    /// Values of this cop's `EnforcedStyle` option, in declaration order.
    fn supported_styles(&self) -> &'static [&'static str] {
        &[]
    }

    /// Which supported styles would accept `node`. `None` for nodes the cop
    /// does not inspect.
    #[allow(unused_variables)]
    fn detect_styles(
        &self,
        source: &SourceFile,
        node: &ruby_prism::Node<'_>,
        config: &CopConfig,
    ) -> Option<StyleSample> {
        None
    }

    fn diagnostic(
        &self,
        source: &SourceFile,
        location: Location,
        config: &CopConfig,
        message: String,
    ) -> Diagnostic {
        Diagnostic {
            path: source.path_str().to_string(),
            location,
            severity: config.severity.unwrap_or_else(|| self.default_severity()),
            cop_name: self.name().to_string(),
            message,
            corrected: false,
            correctable: false,
        }
    }
}
