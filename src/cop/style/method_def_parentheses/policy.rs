use std::fmt;
use std::str::FromStr;

use super::classify::MethodDefNode;

/// The `EnforcedStyle` values of `Style/MethodDefParentheses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnforcedStyle {
    #[default]
    RequireParentheses,
    RequireNoParentheses,
    RequireNoParenthesesExceptMultiline,
}

impl EnforcedStyle {
    /// Declaration order; also the order styles are proposed in by
    /// `--auto-gen-config`.
    pub const ALL: [EnforcedStyle; 3] = [
        EnforcedStyle::RequireParentheses,
        EnforcedStyle::RequireNoParentheses,
        EnforcedStyle::RequireNoParenthesesExceptMultiline,
    ];

    pub const NAMES: [&'static str; 3] = [
        "require_parentheses",
        "require_no_parentheses",
        "require_no_parentheses_except_multiline",
    ];

    pub fn as_str(&self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Position in `ALL`.
    pub fn index(&self) -> usize {
        match self {
            EnforcedStyle::RequireParentheses => 0,
            EnforcedStyle::RequireNoParentheses => 1,
            EnforcedStyle::RequireNoParenthesesExceptMultiline => 2,
        }
    }
}

impl fmt::Display for EnforcedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnforcedStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unrecognized EnforcedStyle `{s}` (supported: {})",
                    Self::NAMES.join(", ")
                )
            })
    }
}

/// The single edit family that closes a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    InsertParens,
    RemoveParens,
}

impl Action {
    /// The correction in words, as it appears in offense messages.
    pub fn message(&self) -> &'static str {
        match self {
            Action::InsertParens => "with parentheses",
            Action::RemoveParens => "without parentheses",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Compliant,
    Violation { action: Action, message: &'static str },
}

impl Verdict {
    fn violation(action: Action) -> Self {
        Verdict::Violation {
            action,
            message: action.message(),
        }
    }

    pub fn is_compliant(&self) -> bool {
        matches!(self, Verdict::Compliant)
    }
}

/// Decide whether `node` satisfies `style`.
///
/// Multi-line parameter lists are the exception of the third style: they
/// keep their parentheses, and get them added when missing.
pub fn evaluate(node: &MethodDefNode, style: EnforcedStyle) -> Verdict {
    if node.forced_parens {
        return Verdict::Compliant;
    }

    let has_params = !node.params.is_empty();
    let has_parens = node.has_parens();

    match style {
        EnforcedStyle::RequireParentheses => {
            if has_params && !has_parens {
                Verdict::violation(Action::InsertParens)
            } else {
                Verdict::Compliant
            }
        }
        EnforcedStyle::RequireNoParentheses => {
            if has_parens {
                Verdict::violation(Action::RemoveParens)
            } else {
                Verdict::Compliant
            }
        }
        EnforcedStyle::RequireNoParenthesesExceptMultiline => {
            match (has_parens, node.multiline) {
                (true, false) => Verdict::violation(Action::RemoveParens),
                (false, true) => Verdict::violation(Action::InsertParens),
                (true, true) | (false, false) => Verdict::Compliant,
            }
        }
    }
}
