use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::diagnostic::Location;
use crate::parse::range::SourceRange;

/// An immutable Ruby source buffer plus its line-start table.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
    /// Byte offsets where each line starts (0-indexed into content)
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::from_vec(path.to_path_buf(), content))
    }

    /// Create a SourceFile from a string, using the given path for display purposes.
    pub fn from_string(path: PathBuf, content: String) -> Self {
        Self::from_vec(path, content.into_bytes())
    }

    pub fn from_vec(path: PathBuf, content: Vec<u8>) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            path,
            content,
            line_starts,
        }
    }

    #[cfg(test)]
    pub fn from_bytes(path: &str, content: Vec<u8>) -> Self {
        Self::from_vec(PathBuf::from(path), content)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    pub fn path_str(&self) -> &str {
        self.path.to_str().unwrap_or("<non-utf8 path>")
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-indexed line containing `byte_offset`.
    pub fn line_of(&self, byte_offset: usize) -> usize {
        match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx.max(1),
        }
    }

    /// Convert a byte offset into a (1-indexed line, 0-indexed column) pair.
    /// Column counts UTF-8 characters, not bytes.
    pub fn offset_to_line_col(&self, byte_offset: usize) -> (usize, usize) {
        let line = self.line_of(byte_offset);
        let start = self.line_starts[line - 1];
        let end = byte_offset.min(self.content.len());
        // Non-continuation bytes mark character starts, even in invalid UTF-8.
        let col = self.content[start..end]
            .iter()
            .filter(|&&b| (b & 0xC0) != 0x80)
            .count();
        (line, col)
    }

    /// Convert a (1-indexed line, 0-indexed character column) pair back to a
    /// byte offset. Returns `None` if the line is out of range.
    pub fn line_col_to_offset(&self, line: usize, col: usize) -> Option<usize> {
        if line == 0 || line > self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.content.len());
        let mut chars_seen = 0;
        for (i, &b) in self.content[start..end].iter().enumerate() {
            if (b & 0xC0) != 0x80 {
                if chars_seen == col {
                    return Some(start + i);
                }
                chars_seen += 1;
            }
        }
        Some(start + col.min(end - start))
    }

    /// Location of the first byte of `range`, for diagnostics.
    pub fn range_location(&self, range: SourceRange) -> Location {
        let (line, column) = self.offset_to_line_col(range.start);
        Location { line, column }
    }

    /// True when `range` contains a line break.
    pub fn is_multiline(&self, range: SourceRange) -> bool {
        range
            .slice(&self.content)
            .is_some_and(|bytes| bytes.contains(&b'\n'))
    }
}

fn compute_line_starts(content: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    starts.extend(
        content
            .iter()
            .enumerate()
            .filter(|&(i, &b)| b == b'\n' && i + 1 < content.len())
            .map(|(i, _)| i + 1),
    );
    starts
}
