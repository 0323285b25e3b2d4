use ruby_prism::Visit;

use crate::cop::enforced_style::StyleTally;
use crate::cop::{Cop, CopConfig};
use crate::correction::Correction;
use crate::diagnostic::Diagnostic;
use crate::parse::source::SourceFile;

/// One enabled cop as seen by the walker.
pub struct WalkerCop<'a> {
    pub cop: &'a dyn Cop,
    pub config: &'a CopConfig,
    /// Registry index, stamped on every correction for tie-breaking.
    pub index: usize,
    /// Collect edits from this cop.
    pub correct: bool,
}

/// Hands every AST node to every enabled cop in a single traversal.
pub struct CopWalker<'a, 'pr> {
    cops: Vec<WalkerCop<'a>>,
    source: &'a SourceFile,
    parse_result: &'a ruby_prism::ParseResult<'pr>,
    diagnostics: Vec<Diagnostic>,
    corrections: Vec<Correction>,
    /// Parallel to `cops` when style detection is on.
    tallies: Option<Vec<StyleTally>>,
}

impl<'a, 'pr> CopWalker<'a, 'pr> {
    pub fn new(
        cops: Vec<WalkerCop<'a>>,
        source: &'a SourceFile,
        parse_result: &'a ruby_prism::ParseResult<'pr>,
    ) -> Self {
        Self {
            cops,
            source,
            parse_result,
            diagnostics: Vec::new(),
            corrections: Vec::new(),
            tallies: None,
        }
    }

    /// Also record which styles each node would satisfy.
    pub fn with_style_detection(mut self) -> Self {
        self.tallies = Some(vec![StyleTally::default(); self.cops.len()]);
        self
    }

    /// Diagnostics, corrections, and per-cop `(registry index, tally)` pairs.
    pub fn into_results(self) -> (Vec<Diagnostic>, Vec<Correction>, Vec<(usize, StyleTally)>) {
        let tallies = match self.tallies {
            Some(t) => self.cops.iter().map(|c| c.index).zip(t).collect(),
            None => Vec::new(),
        };
        (self.diagnostics, self.corrections, tallies)
    }

    fn check(&mut self, node: &ruby_prism::Node<'pr>) {
        for (i, entry) in self.cops.iter().enumerate() {
            let start = self.corrections.len();
            let corrections = if entry.correct {
                Some(&mut self.corrections)
            } else {
                None
            };
            entry.cop.check_node(
                self.source,
                node,
                self.parse_result,
                entry.config,
                &mut self.diagnostics,
                corrections,
            );
            for c in &mut self.corrections[start..] {
                c.cop_index = entry.index;
            }

            if let Some(tallies) = self.tallies.as_mut() {
                if let Some(sample) = entry.cop.detect_styles(self.source, node, entry.config) {
                    tallies[i].record(sample);
                }
            }
        }
    }
}

impl<'pr> Visit<'pr> for CopWalker<'_, 'pr> {
    fn visit_branch_node_enter(&mut self, node: ruby_prism::Node<'pr>) {
        self.check(&node);
    }

    fn visit_leaf_node_enter(&mut self, node: ruby_prism::Node<'pr>) {
        self.check(&node);
    }
}
