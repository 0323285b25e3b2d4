use super::classify::{DefKind, MethodDefNode};
use super::policy::{Action, EnforcedStyle, Verdict};
use crate::parse::range::SourceRange;

/// A reported violation, before it is turned into an engine `Diagnostic`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offense {
    /// The whole parameter list, parentheses included when present.
    pub range: SourceRange,
    /// Where the diagnostic points: the parameter list of an instance
    /// method, the receiver-qualified name of a singleton method.
    pub anchor: SourceRange,
    pub message: String,
    /// Cleared by the cop when the autocorrector reports a hazard.
    pub correctable: bool,
    pub action: Action,
    /// Style the node was checked against.
    pub style: EnforcedStyle,
    pub kind: DefKind,
}

pub fn emit(
    node: &MethodDefNode,
    verdict: Verdict,
    style: EnforcedStyle,
    source: &[u8],
) -> Option<Offense> {
    let Verdict::Violation { action, message } = verdict else {
        return None;
    };
    // A violation always concerns parameters or parentheses, so the range exists.
    let range = node.parameter_list_range()?;
    let anchor = match (node.kind, node.receiver) {
        (DefKind::Singleton, Some(receiver)) => receiver.join(node.name),
        _ => range,
    };
    Some(Offense {
        range,
        anchor,
        message: format!(
            "Use `def {}` {message} (EnforcedStyle: {style}).",
            signature(node, source)
        ),
        correctable: true,
        action,
        style,
        kind: node.kind,
    })
}

/// `name` or `receiver.name` as written.
fn signature(node: &MethodDefNode, source: &[u8]) -> String {
    let text = |range: SourceRange| {
        String::from_utf8_lossy(range.slice(source).unwrap_or_default()).into_owned()
    };
    match node.receiver {
        Some(receiver) => format!("{}.{}", text(receiver), text(node.name)),
        None => text(node.name),
    }
}
