//! Diagnostic model
//!
//! The shapes here follow the LSP diagnostic model closely enough that a
//! transport layer can map them one-to-one, without depending on any
//! transport crate.

use crate::position::{Position, Span};
use serde::{Deserialize, Serialize};

/// Diagnostic severity, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

/// Extra location-bound context attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedInfo {
    pub range: Span,
    pub message: String,
}

/// A single analyzer or parser finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub range: Span,
    pub severity: Severity,
    /// One of the closed set of codes in [`crate::codes`].
    pub code: String,
    pub message: String,
    /// Always `"mbel"`.
    pub source: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_info: Vec<RelatedInfo>,
}

impl Diagnostic {
    pub fn new(range: Span, severity: Severity, code: &str, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            code: code.to_string(),
            message: message.into(),
            source: "mbel".to_string(),
            related_info: Vec::new(),
        }
    }

    pub fn with_related(mut self, range: Span, message: impl Into<String>) -> Self {
        self.related_info.push(RelatedInfo {
            range,
            message: message.into(),
        });
        self
    }

    /// Identity key for de-duplication and quick-fix lookup. Diagnostics are
    /// identified by code and start offset, not by pointer equality.
    pub fn key(&self) -> String {
        format!("{}@{}", self.code, self.range.start.offset)
    }
}

/// A single text replacement. Insertions use an empty range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Span,
    pub new_text: String,
}

impl TextEdit {
    pub fn replace(range: Span, new_text: impl Into<String>) -> Self {
        Self { range, new_text: new_text.into() }
    }

    pub fn insert(at: Position, new_text: impl Into<String>) -> Self {
        Self { range: Span::empty(at), new_text: new_text.into() }
    }

    /// Deletion of the spanned text.
    pub fn delete(range: Span) -> Self {
        Self { range, new_text: String::new() }
    }
}

/// A suggested fix for one diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickFix {
    pub title: String,
    pub edits: Vec<TextEdit>,
    pub is_preferred: bool,
}

impl QuickFix {
    pub fn new(title: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        Self {
            title: title.into(),
            edits,
            is_preferred: false,
        }
    }

    pub fn preferred(title: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        Self {
            title: title.into(),
            edits,
            is_preferred: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_error_first() {
        assert!(Severity::Error < Severity::Warning);
        assert!(Severity::Warning < Severity::Information);
        assert!(Severity::Information < Severity::Hint);
    }

    #[test]
    fn diagnostic_key_uses_code_and_offset() {
        let span = Span::new(Position::new(2, 1, 10), Position::new(2, 4, 13));
        let diag = Diagnostic::new(span, Severity::Warning, "ARTICLE_USAGE", "standalone article");
        assert_eq!(diag.key(), "ARTICLE_USAGE@10");
    }

    #[test]
    fn diagnostic_serializes_with_mbel_source() {
        let diag = Diagnostic::new(Span::default(), Severity::Error, "UNKNOWN_CHARACTER", "x");
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"source\":\"mbel\""));
        assert!(json.contains("\"severity\":\"error\""));
    }
}
