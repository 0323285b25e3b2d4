/// A half-open byte range `[start..end)` into an immutable source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceRange {
    /// Byte offset, inclusive.
    pub start: usize,
    /// Byte offset, exclusive.
    pub end: usize,
}

impl SourceRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {start}..{end}");
        Self { start, end }
    }

    /// Zero-width range at `offset`, used for pure insertions.
    pub fn empty_at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn from_prism(loc: &ruby_prism::Location<'_>) -> Self {
        Self::new(loc.start_offset(), loc.end_offset())
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest range covering both `self` and `other`.
    pub fn join(&self, other: SourceRange) -> SourceRange {
        SourceRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// True when the two ranges share at least one byte. Touching ranges
    /// (`a.end == b.start`) do not intersect, and neither do empty ranges.
    pub fn intersects(&self, other: &SourceRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The bytes covered by this range, or `None` if it falls outside `source`.
    pub fn slice<'a>(&self, source: &'a [u8]) -> Option<&'a [u8]> {
        source.get(self.start..self.end)
    }
}
