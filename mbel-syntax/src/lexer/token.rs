//! Lexer token types

use mbel_core::Span;
use serde::{Deserialize, Serialize};

/// Token kinds for the MBEL notation.
///
/// The set is closed. Bracketed kinds (`StructSection`, `StructList`,
/// `StructMetadata`, `StructNote`, `StructVariant`, `CodeFence`) carry their
/// delimiters in the token text; for unclosed brackets the token is still
/// emitted and a companion [`LexError`] records the missing closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Temporal operators
    /// `>`
    TemporalPast,
    /// `@`
    TemporalPresent,
    /// `?`
    TemporalFuture,
    /// `≈`
    TemporalApprox,

    // State operators
    /// `✓`
    StateComplete,
    /// `✗`
    StateFailed,
    /// `!`
    StateCritical,
    /// `⚡`
    StateActive,

    // Relation operators
    /// `::` (also single `:`)
    RelationDefines,
    /// `→`
    RelationLeadsTo,
    /// `←`
    RelationFrom,
    /// `↔`
    RelationMutual,
    /// `+`
    RelationAnd,
    /// `-`
    RelationRemove,

    // Structure brackets
    /// `[...]` at statement position
    StructSection,
    /// `[...]` following an arrow keyword
    StructList,
    /// `{...}` balanced, nested braces allowed
    StructMetadata,
    /// `(...)`
    StructNote,
    /// `<...>`
    StructVariant,
    /// `|`
    StructOr,

    // Quantification
    /// `#`
    QuantCount,
    /// `%`
    QuantPercent,
    /// `~`
    QuantApprox,

    // Logic
    /// `&`
    LogicAnd,
    /// `||`
    LogicOr,
    /// `¬`
    LogicNot,

    // Meta
    /// `©`
    MetaSource,
    /// `§`
    MetaVersion,

    /// `->keyword` with no whitespace between `->` and the keyword.
    ArrowKeyword,

    // Link markers
    /// `@feature`
    LinkFeature,
    /// `@task`
    LinkTask,

    // Anchor prefixes
    /// `@entry::`
    AnchorEntry,
    /// `@hotspot::`
    AnchorHotspot,
    /// `@boundary::`
    AnchorBoundary,

    // Heat prefixes
    /// `@critical::`
    HeatCritical,
    /// `@stable::`
    HeatStable,
    /// `@volatile::`
    HeatVolatile,
    /// `@hot::`
    HeatHot,

    /// `@YYYY-MM-DD::`
    DecisionDate,
    /// `@Module::` where `Module` begins with an uppercase letter
    IntentModule,

    /// Identifier: letter, `_`, or non-operator code point above U+007F,
    /// then the same plus ASCII digits.
    Identifier,
    /// ASCII digits with optional `.digits` fraction.
    Number,
    /// Non-whitespace run following an anchor or heat prefix.
    Path,
    /// Triple-backtick fenced block, scanned as one token.
    CodeFence,

    /// Statement separator. CRLF is normalized to a single token.
    Newline,
    /// Unrecognized character; lexing continues.
    Unknown,
    /// Terminates every stream.
    Eof,
}

/// The closed set of arrow-clause keywords. Case-sensitive; whitespace
/// between `->` and the keyword disqualifies the match.
pub const ARROW_KEYWORDS: &[&str] = &[
    "files",
    "tests",
    "docs",
    "decisions",
    "related",
    "entryPoint",
    "blueprint",
    "depends",
    "deps",
    "features",
    "why",
    "descrizione",
    "description",
    "alternatives",
    "reason",
    "tradeoff",
    "context",
    "status",
    "revisit",
    "supersededBy",
    "dependents",
    "untouched",
    "changes",
    "coverage",
    "confidence",
    "impact",
    "caution",
    "does",
    "doesNot",
    "contract",
    "singleResponsibility",
    "antiPattern",
    "extends",
];

/// A token with its kind, verbatim text, and source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Verbatim source text, delimiters included for bracketed kinds.
    pub text: String,
    pub span: Span,
}

impl Token {
    /// Keyword of an `ArrowKeyword` token, without the leading `->`.
    pub fn arrow_keyword(&self) -> Option<&str> {
        if self.kind == TokenKind::ArrowKeyword {
            self.text.strip_prefix("->")
        } else {
            None
        }
    }

    /// Module name of an `IntentModule` token (`@Mod::` yields `Mod`).
    pub fn intent_module(&self) -> Option<&str> {
        if self.kind == TokenKind::IntentModule {
            self.text.strip_prefix('@').and_then(|s| s.strip_suffix("::"))
        } else {
            None
        }
    }

    /// Date of a `DecisionDate` token (`@2024-01-15::` yields `2024-01-15`).
    pub fn decision_date(&self) -> Option<&str> {
        if self.kind == TokenKind::DecisionDate {
            self.text.strip_prefix('@').and_then(|s| s.strip_suffix("::"))
        } else {
            None
        }
    }

    /// Text between the delimiters of a bracketed token. For an unclosed
    /// bracket the text simply lacks the closer, so only the opener is
    /// stripped.
    pub fn bracket_inner(&self) -> &str {
        let (open, close) = match self.kind {
            TokenKind::StructSection | TokenKind::StructList => ('[', ']'),
            TokenKind::StructMetadata => ('{', '}'),
            TokenKind::StructNote => ('(', ')'),
            TokenKind::StructVariant => ('<', '>'),
            _ => return &self.text,
        };
        let inner = self.text.strip_prefix(open).unwrap_or(&self.text);
        inner.strip_suffix(close).unwrap_or(inner)
    }

    /// Whether a bracketed token actually ends with its closer.
    pub fn bracket_closed(&self) -> bool {
        let close = match self.kind {
            TokenKind::StructSection | TokenKind::StructList => ']',
            TokenKind::StructMetadata => '}',
            TokenKind::StructNote => ')',
            TokenKind::StructVariant => '>',
            _ => return true,
        };
        self.text.len() > 1 && self.text.ends_with(close)
    }
}

/// A non-fatal lexer finding. The lexer never stops on these; the analyzer
/// re-emits them as diagnostics.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct LexError {
    /// One of the lexical codes in [`mbel_core::codes`].
    pub code: String,
    pub message: String,
    pub span: Span,
}
