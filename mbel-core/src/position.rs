//! Source position model
//!
//! Positions are 1-based for line/column and 0-based for byte offsets.
//! All offsets are UTF-8 byte indices into the original source. Ranges are
//! half-open: `end` is exclusive.

use serde::{Deserialize, Serialize};

/// A single point in a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number, counted in characters.
    pub column: usize,
    /// 0-based byte offset into the source.
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self { line, column, offset }
    }

    /// The start of any document.
    pub fn start() -> Self {
        Self { line: 1, column: 1, offset: 0 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

/// A half-open source range: `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width span at the given position.
    pub fn empty(at: Position) -> Self {
        Self { start: at, end: at }
    }

    /// Byte length of the spanned text.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.end.offset <= self.start.offset
    }

    /// Whether `offset` falls inside the range.
    pub fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.start.offset && offset < self.end.offset
    }

    /// The smallest span covering both `self` and `other`.
    pub fn merge(&self, other: &Span) -> Span {
        let start = if self.start.offset <= other.start.offset {
            self.start
        } else {
            other.start
        };
        let end = if self.end.offset >= other.end.offset {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }

    /// Extract the spanned text from the original source.
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        let start = self.start.offset.min(source.len());
        let end = self.end.offset.min(source.len());
        &source[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_merge_orders_endpoints() {
        let a = Span::new(Position::new(1, 1, 0), Position::new(1, 5, 4));
        let b = Span::new(Position::new(1, 3, 2), Position::new(2, 1, 10));
        let merged = a.merge(&b);
        assert_eq!(merged.start.offset, 0);
        assert_eq!(merged.end.offset, 10);
    }

    #[test]
    fn span_slice_is_clamped() {
        let span = Span::new(Position::new(1, 1, 0), Position::new(1, 99, 99));
        assert_eq!(span.slice("abc"), "abc");
    }

    #[test]
    fn contains_offset_is_half_open() {
        let span = Span::new(Position::new(1, 1, 0), Position::new(1, 4, 3));
        assert!(span.contains_offset(0));
        assert!(span.contains_offset(2));
        assert!(!span.contains_offset(3));
    }
}
