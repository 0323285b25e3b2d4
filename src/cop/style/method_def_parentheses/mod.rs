//! `Style/MethodDefParentheses`: parentheses around method definition
//! parameter lists.
//!
//! ```ruby
//! # require_parentheses (default)
//! def foo(bar, baz)
//! end
//!
//! # require_no_parentheses
//! def foo bar, baz
//! end
//!
//! # require_no_parentheses_except_multiline
//! def foo bar, baz
//! end
//!
//! def long_method(first,
//!                 second)
//! end
//! ```
//!
//! Definitions whose parentheses Ruby cannot do without (endless methods,
//! `...` and anonymous `*`, `**`, `&` parameters) are never reported.

pub mod autocorrect;
pub mod classify;
pub mod offense;
pub mod policy;
pub mod suggest;

use anyhow::{Context, Result};

use crate::cop::enforced_style::StyleSample;
use crate::cop::{Cop, CopConfig};
use crate::correction::Correction;
use crate::diagnostic::{Diagnostic, Severity};
use crate::parse::range::SourceRange;
use crate::parse::source::SourceFile;

use classify::{ClassifyError, classify};
use policy::{EnforcedStyle, evaluate};

pub struct MethodDefParentheses;

impl MethodDefParentheses {
    /// Resolve `EnforcedStyle`, defaulting to `require_parentheses`.
    pub fn enforced_style(config: &CopConfig) -> Result<EnforcedStyle> {
        match config.string_option("EnforcedStyle")? {
            None => Ok(EnforcedStyle::default()),
            Some(name) => name.parse().map_err(anyhow::Error::msg),
        }
    }

    /// A definition the classifier rejected is reported at `Fatal`
    /// severity, whatever the configured severity.
    fn classify_failure(
        &self,
        source: &SourceFile,
        def_range: SourceRange,
        config: &CopConfig,
        error: &ClassifyError,
    ) -> Diagnostic {
        let mut diag = self.diagnostic(
            source,
            source.range_location(def_range),
            config,
            format!("Could not classify method definition: {error}."),
        );
        diag.severity = Severity::Fatal;
        diag
    }
}

impl Cop for MethodDefParentheses {
    fn name(&self) -> &'static str {
        "Style/MethodDefParentheses"
    }

    fn supports_autocorrect(&self) -> bool {
        true
    }

    fn validate_config(&self, config: &CopConfig) -> Result<()> {
        Self::enforced_style(config)
            .map(|_| ())
            .with_context(|| format!("invalid configuration for {}", self.name()))
    }

    fn check_node(
        &self,
        source: &SourceFile,
        node: &ruby_prism::Node<'_>,
        _parse_result: &ruby_prism::ParseResult<'_>,
        config: &CopConfig,
        diagnostics: &mut Vec<Diagnostic>,
        corrections: Option<&mut Vec<Correction>>,
    ) {
        let Some(def_node) = node.as_def_node() else {
            return;
        };
        // Validated before linting starts.
        let Ok(style) = Self::enforced_style(config) else {
            return;
        };

        let method_def = match classify(&def_node, source.as_bytes()) {
            Ok(m) => m,
            Err(e) => {
                let range = SourceRange::from_prism(&def_node.location());
                diagnostics.push(self.classify_failure(source, range, config, &e));
                return;
            }
        };

        let verdict = evaluate(&method_def, style);
        let Some(mut offense) = offense::emit(&method_def, verdict, style, source.as_bytes())
        else {
            return;
        };

        let edits = autocorrect::correct(&method_def, offense.action, source.as_bytes());
        if edits.is_err() {
            offense.correctable = false;
        }

        let mut diag = self.diagnostic(
            source,
            source.range_location(offense.anchor),
            config,
            offense.message,
        );
        diag.correctable = offense.correctable;
        if let (Some(corr), Ok(edits)) = (corrections, edits) {
            corr.extend(
                edits
                    .into_iter()
                    .map(|e| Correction::new(e.range, e.replacement, self.name())),
            );
            diag.corrected = true;
        }
        diagnostics.push(diag);
    }

    fn supported_styles(&self) -> &'static [&'static str] {
        &EnforcedStyle::NAMES
    }

    fn detect_styles(
        &self,
        source: &SourceFile,
        node: &ruby_prism::Node<'_>,
        config: &CopConfig,
    ) -> Option<StyleSample> {
        let def_node = node.as_def_node()?;
        let style = Self::enforced_style(config).ok()?;
        let method_def = classify(&def_node, source.as_bytes()).ok()?;
        Some(suggest::sample(&method_def, style))
    }
}
