//! Abstract Syntax Tree types
//!
//! The AST is a pure tree: statements own their expressions, and nothing
//! points back up. Every node carries its source span. Cross-references
//! between declarations (depends, related, supersededBy, ...) are plain
//! name strings resolved by the query layer, never node pointers.

use mbel_core::{EntryPoint, FileRef, Span};
use serde::{Deserialize, Serialize};

/// The root of a parsed MBEL source: an ordered sequence of statements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub statements: Vec<Statement>,
}

impl Document {
    /// All link declarations (features and tasks) in document order.
    pub fn links(&self) -> impl Iterator<Item = &LinkDeclaration> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Link(link) => Some(link),
            _ => None,
        })
    }

    pub fn anchors(&self) -> impl Iterator<Item = &AnchorDeclaration> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Anchor(anchor) => Some(anchor),
            _ => None,
        })
    }

    pub fn decisions(&self) -> impl Iterator<Item = &DecisionDeclaration> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Decision(decision) => Some(decision),
            _ => None,
        })
    }

    pub fn heat_markers(&self) -> impl Iterator<Item = &HeatDeclaration> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Heat(heat) => Some(heat),
            _ => None,
        })
    }

    pub fn intents(&self) -> impl Iterator<Item = &IntentDeclaration> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Intent(intent) => Some(intent),
            _ => None,
        })
    }
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Section(SectionDeclaration),
    Version(VersionStatement),
    Attribute(AttributeStatement),
    Expression(ExpressionStatement),
    Link(LinkDeclaration),
    Anchor(AnchorDeclaration),
    Decision(DecisionDeclaration),
    Heat(HeatDeclaration),
    Intent(IntentDeclaration),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Section(s) => s.span,
            Statement::Version(s) => s.span,
            Statement::Attribute(s) => s.span,
            Statement::Expression(s) => s.span,
            Statement::Link(s) => s.span,
            Statement::Anchor(s) => s.span,
            Statement::Decision(s) => s.span,
            Statement::Heat(s) => s.span,
            Statement::Intent(s) => s.span,
        }
    }
}

/// `[NAME]` - an organizational region of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDeclaration {
    /// The text between the brackets, verbatim.
    pub name: String,
    pub span: Span,
}

/// `§MBEL:5.0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionStatement {
    pub name: String,
    pub version: String,
    pub span: Span,
}

/// Temporal tag on an attribute statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalKind {
    Past,
    Present,
    Future,
    Approx,
}

/// `@name::value {metadata}` and temporal-less `name::value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeStatement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalKind>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Expression>,
    /// Trailing `{...}` body, verbatim without braces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    pub span: Span,
}

/// A bare expression at statement position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub span: Span,
}

/// Discriminates `@feature{...}` from `@task{...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Feature,
    Task,
}

/// `@feature{Name}` / `@task{Name}` with its arrow clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDeclaration {
    pub link_type: LinkType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<FileRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<FileRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decisions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blueprint: Vec<FileRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<EntryPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    pub span: Span,
}

/// Anchor categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorType {
    Entry,
    Hotspot,
    Boundary,
}

impl AnchorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Hotspot => "hotspot",
            Self::Boundary => "boundary",
        }
    }
}

/// `@entry::path`, `@hotspot::path`, `@boundary::path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorDeclaration {
    pub anchor_type: AnchorType,
    pub path: String,
    pub is_glob: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub span: Span,
}

/// Decision lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionStatus {
    Active,
    Superseded,
    Reconsidering,
}

impl DecisionStatus {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "ACTIVE" => Some(Self::Active),
            "SUPERSEDED" => Some(Self::Superseded),
            "RECONSIDERING" => Some(Self::Reconsidering),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Superseded => "SUPERSEDED",
            Self::Reconsidering => "RECONSIDERING",
        }
    }
}

/// `@YYYY-MM-DD::Name` with its arrow clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionDeclaration {
    /// As written, `YYYY-MM-DD`. Validity is an analyzer concern.
    pub date: String,
    pub name: String,
    /// Raw status text plus its parsed form when recognized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tradeoff: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revisit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
    pub span: Span,
}

impl DecisionDeclaration {
    pub fn parsed_status(&self) -> Option<DecisionStatus> {
        self.status.as_deref().and_then(DecisionStatus::parse)
    }
}

/// Heat categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatType {
    Critical,
    Stable,
    Volatile,
    Hot,
}

impl HeatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Stable => "stable",
            Self::Volatile => "volatile",
            Self::Hot => "hot",
        }
    }
}

/// `@critical::path`, `@stable::path`, `@volatile::path`, `@hot::path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatDeclaration {
    pub heat_type: HeatType,
    pub path: String,
    pub is_glob: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub untouched: Option<String>,
    /// Kept verbatim so non-numeric values stay observable downstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caution: Option<String>,
    pub span: Span,
}

impl HeatDeclaration {
    /// `changes` as an integer, when it is one.
    pub fn changes_count(&self) -> Option<i64> {
        self.changes.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

/// `@Module::component` with behavioral clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDeclaration {
    pub module: String,
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does_not: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_responsibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anti_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,
    pub span: Span,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// Chain operators, all left-associative at one precedence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainOp {
    Defines,
    LeadsTo,
    From,
    Mutual,
    And,
    Remove,
}

impl ChainOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Defines => "::",
            Self::LeadsTo => "→",
            Self::From => "←",
            Self::Mutual => "↔",
            Self::And => "+",
            Self::Remove => "-",
        }
    }
}

/// Logic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicOp {
    And,
    Or,
    Not,
}

/// State operators, prefix or postfix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateKind {
    Complete,
    Failed,
    Critical,
    Active,
}

impl StateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "✓",
            Self::Failed => "✗",
            Self::Critical => "!",
            Self::Active => "⚡",
        }
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Identifier {
        name: String,
        /// `{...}` suffix body, verbatim without braces.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metadata: Option<String>,
        span: Span,
    },
    Number {
        value: f64,
        text: String,
        span: Span,
    },
    Chain {
        left: Box<Expression>,
        op: ChainOp,
        right: Box<Expression>,
        span: Span,
    },
    Logic {
        op: LogicOp,
        operands: Vec<Expression>,
        span: Span,
    },
    State {
        state: StateKind,
        operand: Box<Expression>,
        span: Span,
    },
    /// Standalone `{...}` body, verbatim without braces.
    Metadata { body: String, span: Span },
    /// `(...)` body, verbatim without parentheses.
    Note { body: String, span: Span },
    /// `<...>` body, verbatim without angle brackets.
    Variant { body: String, span: Span },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier { span, .. }
            | Expression::Number { span, .. }
            | Expression::Chain { span, .. }
            | Expression::Logic { span, .. }
            | Expression::State { span, .. }
            | Expression::Metadata { span, .. }
            | Expression::Note { span, .. }
            | Expression::Variant { span, .. } => *span,
        }
    }
}
