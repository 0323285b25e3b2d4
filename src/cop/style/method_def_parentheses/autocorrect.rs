use thiserror::Error;

use super::classify::MethodDefNode;
use super::policy::Action;
use crate::parse::range::SourceRange;

/// One independent range replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: SourceRange,
    pub replacement: String,
}

impl Edit {
    fn replace(range: SourceRange, replacement: &str) -> Self {
        Self {
            range,
            replacement: replacement.to_string(),
        }
    }

    fn insert(offset: usize, text: &str) -> Self {
        Self::replace(SourceRange::empty_at(offset), text)
    }

    fn delete(range: SourceRange) -> Self {
        Self::replace(range, "")
    }
}

/// Reasons to report an offense without offering a correction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrectionHazard {
    #[error("the method name and first parameter are separated by more than spaces")]
    NonBlankGap,
    #[error("a line break precedes a parameter separator")]
    LineBreakBeforeParameter,
    #[error("the parameter list has nothing to add or remove")]
    NothingToCorrect,
    #[error("node ranges fall outside the source buffer")]
    OutOfBounds,
    #[error("parenthesis edits would overlap")]
    OverlappingEdits,
}

/// Edits that bring `node` in line with `action`.
///
/// Only the two parenthesis characters change. Whitespace and line breaks
/// inside the parameter list are preserved, except that the gap between the
/// name and an unparenthesized first parameter collapses into the `(`.
pub fn correct(
    node: &MethodDefNode,
    action: Action,
    source: &[u8],
) -> Result<Vec<Edit>, CorrectionHazard> {
    let mut edits = match action {
        Action::InsertParens => insert_parens(node, source)?,
        Action::RemoveParens => remove_parens(node, source)?,
    };
    edits.sort_by_key(|e| e.range);
    if edits
        .windows(2)
        .any(|w| w[0].range.intersects(&w[1].range) || w[0].range.end > w[1].range.start)
    {
        return Err(CorrectionHazard::OverlappingEdits);
    }
    Ok(edits)
}

fn insert_parens(node: &MethodDefNode, source: &[u8]) -> Result<Vec<Edit>, CorrectionHazard> {
    if node.has_parens() {
        return Err(CorrectionHazard::NothingToCorrect);
    }
    let (Some(first), Some(last)) = (node.first_param(), node.last_param()) else {
        return Err(CorrectionHazard::NothingToCorrect);
    };
    if last.end > source.len() {
        return Err(CorrectionHazard::OutOfBounds);
    }

    let gap = SourceRange::new(node.name.end, first.start);
    let gap_bytes = gap.slice(source).ok_or(CorrectionHazard::OutOfBounds)?;
    if !gap_bytes.iter().all(|&b| b == b' ' || b == b'\t') {
        return Err(CorrectionHazard::NonBlankGap);
    }

    Ok(vec![Edit::replace(gap, "("), Edit::insert(last.end, ")")])
}

fn remove_parens(node: &MethodDefNode, source: &[u8]) -> Result<Vec<Edit>, CorrectionHazard> {
    let Some(parens) = node.parens else {
        return Err(CorrectionHazard::NothingToCorrect);
    };
    if parens.close.end > source.len() {
        return Err(CorrectionHazard::OutOfBounds);
    }
    check_unparenthesized_layout(node, parens.open.end, source)?;

    let open = if !node.params.is_empty() && parens.open.start == node.name.end {
        Edit::replace(parens.open, " ")
    } else {
        Edit::delete(parens.open)
    };
    Ok(vec![open, Edit::delete(parens.close)])
}

/// Without parentheses Ruby only continues a parameter list across lines
/// right after a comma, so every line break before a parameter must follow
/// the separating comma.
fn check_unparenthesized_layout(
    node: &MethodDefNode,
    list_start: usize,
    source: &[u8],
) -> Result<(), CorrectionHazard> {
    let mut prev_end = list_start;
    for (i, param) in node.params.iter().enumerate() {
        let gap = SourceRange::new(prev_end, param.start)
            .slice(source)
            .ok_or(CorrectionHazard::OutOfBounds)?;
        let broken = if i == 0 {
            gap.contains(&b'\n')
        } else {
            let comma = gap.iter().position(|&b| b == b',').unwrap_or(gap.len());
            gap[..comma].contains(&b'\n')
        };
        if broken {
            return Err(CorrectionHazard::LineBreakBeforeParameter);
        }
        prev_end = param.end;
    }
    Ok(())
}
