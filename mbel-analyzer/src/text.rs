//! Offset-to-position mapping for text-level checks.

use mbel_core::{Position, Span};

/// Maps byte offsets to 1-based line/column positions.
pub struct LineIndex {
    /// Byte offset of the start of each line.
    starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                starts.push(i + 1);
            }
        }
        Self {
            starts,
            len: source.len(),
        }
    }

    /// Position of a byte offset. Columns count bytes from the line start
    /// plus one; for the ASCII-dominated check sites this matches character
    /// columns.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Position::new(line + 1, offset - self.starts[line] + 1, offset)
    }

    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.position(start), self.position(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_offsets_across_lines() {
        let index = LineIndex::new("ab\ncd\n");
        assert_eq!(index.position(0), Position::new(1, 1, 0));
        assert_eq!(index.position(1), Position::new(1, 2, 1));
        assert_eq!(index.position(3), Position::new(2, 1, 3));
        assert_eq!(index.position(4), Position::new(2, 2, 4));
    }

    #[test]
    fn clamps_past_the_end() {
        let index = LineIndex::new("ab");
        assert_eq!(index.position(99).offset, 2);
    }
}
