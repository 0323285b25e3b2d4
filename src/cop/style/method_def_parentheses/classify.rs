use thiserror::Error;

use crate::parse::range::SourceRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    /// `def name`
    Instance,
    /// `def self.name` / `def Receiver.name`
    Singleton,
}

/// Source ranges of the parenthesis characters around a parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parens {
    pub open: SourceRange,
    pub close: SourceRange,
}

/// Parser-independent view of one method definition, as far as
/// parenthesization is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefNode {
    pub kind: DefKind,
    pub receiver: Option<SourceRange>,
    pub name: SourceRange,
    /// Parameter tokens in source order.
    pub params: Vec<SourceRange>,
    pub parens: Option<Parens>,
    /// The parameter list, parentheses included, is broken across lines.
    /// Always false without parameters.
    pub multiline: bool,
    /// Ruby requires the parentheses here whatever the style: endless
    /// definitions and anonymous or `...` forwarding parameters.
    pub forced_parens: bool,
}

impl MethodDefNode {
    pub fn has_parens(&self) -> bool {
        self.parens.is_some()
    }

    pub fn first_param(&self) -> Option<SourceRange> {
        self.params.first().copied()
    }

    pub fn last_param(&self) -> Option<SourceRange> {
        self.params.last().copied()
    }

    /// From the open paren (or first parameter) to the close paren (or end
    /// of the last parameter). `None` for a bare `def name`.
    pub fn parameter_list_range(&self) -> Option<SourceRange> {
        match self.parens {
            Some(parens) => Some(parens.open.join(parens.close)),
            None => Some(self.first_param()?.join(self.last_param()?)),
        }
    }
}

/// A definition whose ranges don't describe a well-formed parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("parenthesis at offset {offset} has no matching counterpart")]
    UnbalancedParens { offset: usize },
    #[error("parameter at offset {offset} starts before the end of the method name")]
    ParameterBeforeName { offset: usize },
    #[error("parameter at offset {offset} lies outside the parentheses")]
    ParameterOutsideParens { offset: usize },
}

/// Build a `MethodDefNode` from a Prism `def`.
pub fn classify(
    def_node: &ruby_prism::DefNode<'_>,
    source: &[u8],
) -> Result<MethodDefNode, ClassifyError> {
    let name = SourceRange::from_prism(&def_node.name_loc());
    let receiver = def_node
        .receiver()
        .map(|r| SourceRange::from_prism(&r.location()));
    let kind = if receiver.is_some() {
        DefKind::Singleton
    } else {
        DefKind::Instance
    };

    let parens = match (def_node.lparen_loc(), def_node.rparen_loc()) {
        (Some(open), Some(close)) => Some(Parens {
            open: SourceRange::from_prism(&open),
            close: SourceRange::from_prism(&close),
        }),
        (None, None) => None,
        (Some(lone), None) | (None, Some(lone)) => {
            return Err(ClassifyError::UnbalancedParens {
                offset: lone.start_offset(),
            });
        }
    };

    let params = def_node
        .parameters()
        .map(|p| parameter_ranges(&p))
        .unwrap_or_default();

    let mut forced_parens = def_node.equal_loc().is_some();
    if let Some(p) = def_node.parameters() {
        forced_parens |= has_anonymous_forwarding(&p);
    }

    let node = MethodDefNode {
        kind,
        receiver,
        name,
        multiline: false,
        params,
        parens,
        forced_parens,
    };
    validate(&node)?;

    let multiline = !node.params.is_empty()
        && node
            .parameter_list_range()
            .and_then(|r| r.slice(source))
            .is_some_and(|bytes| bytes.contains(&b'\n'));

    Ok(MethodDefNode { multiline, ..node })
}

fn parameter_ranges(params: &ruby_prism::ParametersNode<'_>) -> Vec<SourceRange> {
    let mut ranges: Vec<SourceRange> = Vec::new();
    for list in [
        params.requireds(),
        params.optionals(),
        params.posts(),
        params.keywords(),
    ] {
        ranges.extend(list.iter().map(|n| SourceRange::from_prism(&n.location())));
    }
    if let Some(rest) = params.rest() {
        ranges.push(SourceRange::from_prism(&rest.location()));
    }
    if let Some(kwrest) = params.keyword_rest() {
        ranges.push(SourceRange::from_prism(&kwrest.location()));
    }
    if let Some(block) = params.block() {
        ranges.push(SourceRange::from_prism(&block.location()));
    }
    ranges.sort();
    ranges
}

/// `...`, bare `*`, `**` or `&` cannot be written without parentheses.
fn has_anonymous_forwarding(params: &ruby_prism::ParametersNode<'_>) -> bool {
    let forwarding_or_anon_kwrest = params.keyword_rest().is_some_and(|n| {
        n.as_forwarding_parameter_node().is_some()
            || n
                .as_keyword_rest_parameter_node()
                .is_some_and(|k| k.name().is_none())
    });
    let anon_rest = params
        .rest()
        .and_then(|n| n.as_rest_parameter_node())
        .is_some_and(|r| r.name().is_none());
    let anon_block = params.block().is_some_and(|b| b.name().is_none());
    forwarding_or_anon_kwrest || anon_rest || anon_block
}

fn validate(node: &MethodDefNode) -> Result<(), ClassifyError> {
    if let Some(parens) = node.parens {
        if parens.open.start < node.name.end || parens.close.start < parens.open.end {
            return Err(ClassifyError::UnbalancedParens {
                offset: parens.open.start,
            });
        }
        if let Some(outside) = node
            .params
            .iter()
            .find(|p| p.start < parens.open.end || p.end > parens.close.start)
        {
            return Err(ClassifyError::ParameterOutsideParens {
                offset: outside.start,
            });
        }
    }
    match node.first_param() {
        Some(first) if first.start < node.name.end => Err(ClassifyError::ParameterBeforeName {
            offset: first.start,
        }),
        _ => Ok(()),
    }
}
