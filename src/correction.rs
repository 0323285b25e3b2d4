use crate::parse::range::SourceRange;

/// A single source-level edit produced by a cop: replace `range` with
/// `replacement`. An empty range is an insertion, an empty replacement a
/// deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub range: SourceRange,
    pub replacement: String,
    /// Cop that produced this correction.
    pub cop_name: &'static str,
    /// Registry index for deterministic conflict resolution (lower wins).
    pub cop_index: usize,
}

impl Correction {
    pub fn new(range: SourceRange, replacement: impl Into<String>, cop_name: &'static str) -> Self {
        Self {
            range,
            replacement: replacement.into(),
            cop_name,
            cop_index: 0,
        }
    }
}

/// Non-overlapping corrections from every cop for one pass over a file,
/// sorted by start offset.
///
/// Overlapping corrections are resolved by dropping the later one; when two
/// start at the same offset the lower registry index wins. Dropped edits are
/// picked up again on the next pass of the autocorrect loop, once the
/// accepted ones have been applied and offsets re-derived.
#[derive(Debug)]
pub struct CorrectionSet {
    corrections: Vec<Correction>,
    dropped: usize,
}

impl CorrectionSet {
    pub fn from_vec(mut raw: Vec<Correction>) -> Self {
        raw.sort_by(|a, b| {
            a.range
                .start
                .cmp(&b.range.start)
                .then(a.cop_index.cmp(&b.cop_index))
        });

        let mut accepted: Vec<Correction> = Vec::with_capacity(raw.len());
        let mut dropped = 0;
        for c in raw {
            let overlaps = accepted.last().is_some_and(|last| {
                c.range.start < last.range.end
                    // Two insertions at one offset would interleave unpredictably.
                    || (c.range.is_empty() && last.range == c.range && last.cop_name != c.cop_name)
            });
            if overlaps {
                dropped += 1;
                continue;
            }
            accepted.push(c);
        }

        Self {
            corrections: accepted,
            dropped,
        }
    }

    /// Apply corrections to source bytes in a single linear scan.
    pub fn apply(&self, source: &[u8]) -> Vec<u8> {
        let mut result = Vec::with_capacity(source.len() + self.corrections.len());
        let mut cursor = 0;

        for c in &self.corrections {
            if c.range.start > cursor {
                result.extend_from_slice(&source[cursor..c.range.start]);
            }
            result.extend_from_slice(c.replacement.as_bytes());
            cursor = c.range.end;
        }

        if cursor < source.len() {
            result.extend_from_slice(&source[cursor..]);
        }

        result
    }

    /// Number of corrections discarded because they overlapped an accepted one.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}
