//! Parser implementation
//!
//! Top-down, hand-written, error-recovering. Statement recognition is by
//! first token, in the priority order of the notation: version, section,
//! link, anchor, decision, heat, intent, temporal attribute, then plain
//! expressions. A failed statement records a [`ParseError`] and the parser
//! synchronizes at the next newline or statement starter; malformed
//! declarations never abort the document.

use super::ast::*;
use crate::lexer::{tokenize, LexError, Token, TokenKind};
use mbel_core::{codes, EntryPoint, FileMarker, FileRef, LineRange, Position, Span};
use serde::{Deserialize, Serialize};

/// A syntactic error with its source position.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ParseError {
    /// One of the syntactic codes in [`mbel_core::codes`].
    pub code: String,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    fn new(code: &str, message: impl Into<String>, span: Span) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            span,
        }
    }
}

/// Everything `parse` produces: the source it was given, the document, the
/// token stream it was built from, and both error channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub source: String,
    pub document: Document,
    pub tokens: Vec<Token>,
    pub lex_errors: Vec<LexError>,
    pub parse_errors: Vec<ParseError>,
}

impl ParseResult {
    /// Lexical and syntactic errors merged, in source order.
    pub fn errors(&self) -> Vec<ParseError> {
        let mut all: Vec<ParseError> = self
            .lex_errors
            .iter()
            .map(|e| ParseError::new(&e.code, e.message.clone(), e.span))
            .chain(self.parse_errors.iter().cloned())
            .collect();
        all.sort_by_key(|e| e.span.start.offset);
        all
    }

    pub fn is_clean(&self) -> bool {
        self.lex_errors.is_empty() && self.parse_errors.is_empty()
    }
}

/// Parse a source string into a document. Never fails: a fully malformed
/// source yields a document with zero statements and a list of errors.
pub fn parse(source: &str) -> ParseResult {
    let (tokens, lex_errors) = tokenize(source);
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        errors: Vec::new(),
    };
    let document = parser.parse_document();
    tracing::debug!(
        statements = document.statements.len(),
        parse_errors = parser.errors.len(),
        "parsed document"
    );
    ParseResult {
        source: source.to_string(),
        document,
        tokens: parser.tokens,
        lex_errors,
        parse_errors: parser.errors,
    }
}

/// Keywords whose clause value is a bracketed list.
const LIST_KEYWORDS: &[&str] = &[
    "files",
    "tests",
    "docs",
    "decisions",
    "related",
    "depends",
    "deps",
    "blueprint",
    "features",
    "alternatives",
    "context",
    "dependents",
    "extends",
];

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn parse_document(&mut self) -> Document {
        let mut statements = Vec::new();

        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }
            match self.parse_statement() {
                Ok(Some(statement)) => statements.push(statement),
                Ok(None) => {}
                Err(error) => {
                    self.errors.push(error);
                    self.synchronize();
                }
            }
        }

        Document { statements }
    }

    /// Statement dispatch on the first non-trivial token.
    fn parse_statement(&mut self) -> Result<Option<Statement>, ParseError> {
        match self.current().kind {
            TokenKind::MetaVersion => self.parse_version().map(Some),
            TokenKind::StructSection => Ok(Some(self.parse_section())),
            TokenKind::LinkFeature | TokenKind::LinkTask => Ok(Some(self.parse_link())),
            TokenKind::AnchorEntry | TokenKind::AnchorHotspot | TokenKind::AnchorBoundary => {
                Ok(Some(self.parse_anchor()))
            }
            TokenKind::DecisionDate => Ok(Some(self.parse_decision())),
            TokenKind::HeatCritical
            | TokenKind::HeatStable
            | TokenKind::HeatVolatile
            | TokenKind::HeatHot => Ok(Some(self.parse_heat())),
            TokenKind::IntentModule => Ok(Some(self.parse_intent())),
            TokenKind::TemporalPast
            | TokenKind::TemporalPresent
            | TokenKind::TemporalFuture
            | TokenKind::TemporalApprox => self.parse_temporal_attribute().map(Some),
            TokenKind::Identifier if self.peek_kind(1) == TokenKind::RelationDefines => {
                self.parse_attribute(None).map(Some)
            }
            TokenKind::CodeFence | TokenKind::Unknown => {
                // Fenced blocks and stray characters carry no statement.
                self.advance();
                Ok(None)
            }
            _ => self.parse_expression_statement().map(Some),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// `§MBEL:5.0`
    fn parse_version(&mut self) -> Result<Statement, ParseError> {
        let start = self.current().span.start;
        self.advance(); // §
        let name = self.expect_identifier()?;
        self.expect(TokenKind::RelationDefines)?;
        let (version, end) = self.rest_of_line();
        if version.is_empty() {
            return Err(ParseError::new(
                codes::EXPECTED_VERSION,
                "Expected version string after ':'",
                Span::empty(end),
            ));
        }
        Ok(Statement::Version(VersionStatement {
            name,
            version,
            span: Span::new(start, end),
        }))
    }

    /// `[NAME]` - the body text between the brackets is the name, verbatim.
    fn parse_section(&mut self) -> Statement {
        let token = self.current().clone();
        self.advance();
        Statement::Section(SectionDeclaration {
            name: token.bracket_inner().to_string(),
            span: token.span,
        })
    }

    /// `@feature{Name}` / `@task{Name}` plus arrow clauses.
    fn parse_link(&mut self) -> Statement {
        let start = self.current().span.start;
        let link_type = if self.current().kind == TokenKind::LinkFeature {
            LinkType::Feature
        } else {
            LinkType::Task
        };
        self.advance();

        // A missing name block is a semantic finding, not a parse failure.
        let name = if self.current().kind == TokenKind::StructMetadata {
            let name = self.current().bracket_inner().trim().to_string();
            self.advance();
            name
        } else {
            String::new()
        };

        let mut link = LinkDeclaration {
            link_type,
            name,
            files: Vec::new(),
            tests: Vec::new(),
            docs: Vec::new(),
            decisions: Vec::new(),
            related: Vec::new(),
            depends: Vec::new(),
            blueprint: Vec::new(),
            features: Vec::new(),
            entry_point: None,
            why: None,
            span: Span::empty(start),
        };

        while let Some(keyword) = self.next_clause() {
            match keyword.as_str() {
                "files" => link.files = self.clause_file_list(&keyword),
                "tests" => link.tests = self.clause_file_list(&keyword),
                "docs" => link.docs = self.clause_file_list(&keyword),
                "blueprint" => link.blueprint = self.clause_file_list(&keyword),
                "decisions" => link.decisions = self.clause_string_list(&keyword),
                "related" => link.related = self.clause_string_list(&keyword),
                "depends" | "deps" => link.depends = self.clause_string_list(&keyword),
                "features" => link.features = self.clause_string_list(&keyword),
                "entryPoint" => link.entry_point = self.clause_entry_point(),
                "why" => link.why = Some(self.clause_scalar()),
                _ => self.discard_clause_value(&keyword),
            }
        }

        link.span = Span::new(start, self.prev_end());
        Statement::Link(link)
    }

    /// `@entry::path` / `@hotspot::path` / `@boundary::path`.
    fn parse_anchor(&mut self) -> Statement {
        let start = self.current().span.start;
        let anchor_type = match self.current().kind {
            TokenKind::AnchorEntry => AnchorType::Entry,
            TokenKind::AnchorHotspot => AnchorType::Hotspot,
            _ => AnchorType::Boundary,
        };
        self.advance();

        let path = self.take_path();
        let mut description = None;

        while let Some(keyword) = self.next_clause() {
            match keyword.as_str() {
                "descrizione" | "description" => description = Some(self.clause_scalar()),
                _ => self.discard_clause_value(&keyword),
            }
        }

        Statement::Anchor(AnchorDeclaration {
            anchor_type,
            is_glob: mbel_core::path_is_glob(&path),
            path,
            description,
            span: Span::new(start, self.prev_end()),
        })
    }

    /// `@YYYY-MM-DD::Name` plus arrow clauses.
    fn parse_decision(&mut self) -> Statement {
        let start = self.current().span.start;
        let date = self
            .current()
            .decision_date()
            .unwrap_or_default()
            .to_string();
        self.advance();

        let name = if self.current().kind == TokenKind::Identifier {
            let name = self.current().text.clone();
            self.advance();
            name
        } else {
            String::new()
        };

        let mut decision = DecisionDeclaration {
            date,
            name,
            status: None,
            reason: None,
            tradeoff: None,
            revisit: None,
            superseded_by: None,
            alternatives: Vec::new(),
            context: Vec::new(),
            span: Span::empty(start),
        };

        while let Some(keyword) = self.next_clause() {
            match keyword.as_str() {
                "status" => decision.status = Some(self.clause_scalar()),
                "reason" => decision.reason = Some(self.clause_scalar()),
                "tradeoff" => decision.tradeoff = Some(self.clause_scalar()),
                "revisit" => decision.revisit = Some(self.clause_scalar()),
                "supersededBy" => decision.superseded_by = Some(self.clause_scalar()),
                "alternatives" => decision.alternatives = self.clause_string_list(&keyword),
                "context" => decision.context = self.clause_string_list(&keyword),
                _ => self.discard_clause_value(&keyword),
            }
        }

        decision.span = Span::new(start, self.prev_end());
        Statement::Decision(decision)
    }

    /// `@critical::path` / `@stable::path` / `@volatile::path` / `@hot::path`.
    fn parse_heat(&mut self) -> Statement {
        let start = self.current().span.start;
        let heat_type = match self.current().kind {
            TokenKind::HeatCritical => HeatType::Critical,
            TokenKind::HeatStable => HeatType::Stable,
            TokenKind::HeatVolatile => HeatType::Volatile,
            _ => HeatType::Hot,
        };
        self.advance();

        let path = self.take_path();
        let mut heat = HeatDeclaration {
            heat_type,
            is_glob: mbel_core::path_is_glob(&path),
            path,
            dependents: Vec::new(),
            untouched: None,
            changes: None,
            coverage: None,
            confidence: None,
            impact: None,
            caution: None,
            span: Span::empty(start),
        };

        while let Some(keyword) = self.next_clause() {
            match keyword.as_str() {
                "dependents" => heat.dependents = self.clause_string_list(&keyword),
                "untouched" => heat.untouched = Some(self.clause_scalar()),
                "changes" => heat.changes = Some(self.clause_scalar()),
                "coverage" => heat.coverage = Some(self.clause_scalar()),
                "confidence" => heat.confidence = Some(self.clause_scalar()),
                "impact" => heat.impact = Some(self.clause_scalar()),
                "caution" => heat.caution = Some(self.clause_scalar()),
                _ => self.discard_clause_value(&keyword),
            }
        }

        heat.span = Span::new(start, self.prev_end());
        Statement::Heat(heat)
    }

    /// `@Module::component` plus behavioral clauses.
    fn parse_intent(&mut self) -> Statement {
        let start = self.current().span.start;
        let module = self
            .current()
            .intent_module()
            .unwrap_or_default()
            .to_string();
        self.advance();

        let component = if self.current().kind == TokenKind::Identifier {
            let name = self.current().text.clone();
            self.advance();
            name
        } else {
            String::new()
        };

        let mut intent = IntentDeclaration {
            module,
            component,
            does: None,
            does_not: None,
            contract: None,
            single_responsibility: None,
            anti_pattern: None,
            extends: Vec::new(),
            span: Span::empty(start),
        };

        while let Some(keyword) = self.next_clause() {
            match keyword.as_str() {
                "does" => intent.does = Some(self.clause_scalar()),
                "doesNot" => intent.does_not = Some(self.clause_scalar()),
                "contract" => intent.contract = Some(self.clause_scalar()),
                "singleResponsibility" => {
                    intent.single_responsibility = Some(self.clause_scalar())
                }
                "antiPattern" => intent.anti_pattern = Some(self.clause_scalar()),
                "extends" => intent.extends = self.clause_string_list(&keyword),
                _ => self.discard_clause_value(&keyword),
            }
        }

        intent.span = Span::new(start, self.prev_end());
        Statement::Intent(intent)
    }

    /// `>name::value`, `@name::value`, `?name::value`, `≈name::value`.
    fn parse_temporal_attribute(&mut self) -> Result<Statement, ParseError> {
        let temporal = match self.current().kind {
            TokenKind::TemporalPast => TemporalKind::Past,
            TokenKind::TemporalPresent => TemporalKind::Present,
            TokenKind::TemporalFuture => TemporalKind::Future,
            _ => TemporalKind::Approx,
        };
        let start = self.current().span.start;
        self.advance();

        if self.current().kind != TokenKind::Identifier {
            return Err(ParseError::new(
                codes::EXPECTED_IDENTIFIER,
                "Expected identifier after temporal operator",
                self.current().span,
            ));
        }
        self.parse_attribute_from(start, Some(temporal))
    }

    fn parse_attribute(&mut self, temporal: Option<TemporalKind>) -> Result<Statement, ParseError> {
        let start = self.current().span.start;
        self.parse_attribute_from(start, temporal)
    }

    fn parse_attribute_from(
        &mut self,
        start: Position,
        temporal: Option<TemporalKind>,
    ) -> Result<Statement, ParseError> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::RelationDefines)?;

        let mut value = None;
        let mut metadata = None;

        if !self.at_line_end() {
            if self.current().kind == TokenKind::StructMetadata {
                metadata = Some(self.current().bracket_inner().to_string());
                self.advance();
            } else {
                value = Some(self.parse_expression()?);
                if self.current().kind == TokenKind::StructMetadata {
                    metadata = Some(self.current().bracket_inner().to_string());
                    self.advance();
                }
            }
        }

        self.consume_to_line_end();
        Ok(Statement::Attribute(AttributeStatement {
            temporal,
            name,
            value,
            metadata,
            span: Span::new(start, self.prev_end()),
        }))
    }

    /// Any other line: one expression, prose remainder tolerated.
    fn parse_expression_statement(&mut self) -> Result<Statement, ParseError> {
        let expression = self.parse_expression()?;
        let span = expression.span();
        self.consume_to_line_end();
        Ok(Statement::Expression(ExpressionStatement { expression, span }))
    }

    // ========================================================================
    // Arrow clauses
    // ========================================================================

    /// Consume the next arrow keyword, crossing newlines only when the next
    /// statement begins with one. Returns `None` when the declaration ends.
    fn next_clause(&mut self) -> Option<String> {
        if self.current().kind == TokenKind::ArrowKeyword {
            let keyword = self.current().arrow_keyword().unwrap_or_default().to_string();
            self.advance();
            return Some(keyword);
        }
        if self.current().kind == TokenKind::Newline {
            let mut ahead = self.pos;
            while self.tokens[ahead].kind == TokenKind::Newline {
                ahead += 1;
            }
            if self.tokens[ahead].kind == TokenKind::ArrowKeyword {
                self.pos = ahead;
                let keyword = self.current().arrow_keyword().unwrap_or_default().to_string();
                self.advance();
                return Some(keyword);
            }
        }
        None
    }

    /// List clause producing file references.
    fn clause_file_list(&mut self, keyword: &str) -> Vec<FileRef> {
        self.clause_list_items(keyword)
            .into_iter()
            .map(|item| parse_file_item(&item))
            .collect()
    }

    /// List clause producing plain strings (names, labels, paths).
    fn clause_string_list(&mut self, keyword: &str) -> Vec<String> {
        self.clause_list_items(keyword)
            .into_iter()
            .map(|item| strip_quotes(item.trim()).to_string())
            .collect()
    }

    /// Raw comma-split items of the next list token. Missing list records a
    /// parse error; the declaration keeps its other fields.
    fn clause_list_items(&mut self, keyword: &str) -> Vec<String> {
        if self.current().kind != TokenKind::StructList {
            self.errors.push(ParseError::new(
                codes::EXPECTED_LIST,
                format!("Expected [...] list after ->{keyword}"),
                self.current().span,
            ));
            return Vec::new();
        }
        let inner = self.current().bracket_inner().to_string();
        self.advance();
        split_top_level(&inner)
    }

    /// `->entryPoint{file:symbol:line}`; symbol and line are optional.
    fn clause_entry_point(&mut self) -> Option<EntryPoint> {
        if self.current().kind != TokenKind::StructMetadata {
            self.errors.push(ParseError::new(
                codes::UNEXPECTED_TOKEN,
                "Expected {file:symbol:line} after ->entryPoint",
                self.current().span,
            ));
            return None;
        }
        let inner = self.current().bracket_inner().to_string();
        self.advance();

        let mut parts = inner.splitn(3, ':');
        let file = parts.next().unwrap_or_default().trim().to_string();
        let symbol = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let line = parts.next().and_then(|s| s.trim().parse().ok());
        Some(EntryPoint { file, symbol, line })
    }

    /// Scalar clause value: `{...}` body, `::rest-of-line`, or the rest of
    /// the line as written.
    fn clause_scalar(&mut self) -> String {
        match self.current().kind {
            TokenKind::StructMetadata => {
                let value = self.current().bracket_inner().trim().to_string();
                self.advance();
                value
            }
            TokenKind::RelationDefines => {
                self.advance();
                self.rest_of_line().0
            }
            _ => self.rest_of_line().0,
        }
    }

    /// A clause this declaration kind does not use: consume its value so the
    /// stream stays aligned.
    fn discard_clause_value(&mut self, keyword: &str) {
        if LIST_KEYWORDS.contains(&keyword) {
            if self.current().kind == TokenKind::StructList {
                self.advance();
            }
        } else {
            let _ = self.clause_scalar();
        }
    }

    /// Path token after an anchor/heat prefix, or empty.
    fn take_path(&mut self) -> String {
        if self.current().kind == TokenKind::Path {
            let path = self.current().text.clone();
            self.advance();
            path
        } else {
            String::new()
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        let first = self.parse_and()?;
        if self.current().kind != TokenKind::LogicOr {
            return Ok(first);
        }
        let start = first.span().start;
        let mut operands = vec![first];
        while self.current().kind == TokenKind::LogicOr {
            self.advance();
            operands.push(self.parse_and()?);
        }
        let end = operands.last().map(|e| e.span().end).unwrap_or(start);
        Ok(Expression::Logic {
            op: LogicOp::Or,
            operands,
            span: Span::new(start, end),
        })
    }

    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        let first = self.parse_unary()?;
        if self.current().kind != TokenKind::LogicAnd {
            return Ok(first);
        }
        let start = first.span().start;
        let mut operands = vec![first];
        while self.current().kind == TokenKind::LogicAnd {
            self.advance();
            operands.push(self.parse_unary()?);
        }
        let end = operands.last().map(|e| e.span().end).unwrap_or(start);
        Ok(Expression::Logic {
            op: LogicOp::And,
            operands,
            span: Span::new(start, end),
        })
    }

    /// Prefix `¬` and prefix state operators bind tighter than logic but
    /// looser than chains.
    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let start = self.current().span.start;
        if self.current().kind == TokenKind::LogicNot {
            self.advance();
            let operand = self.parse_unary()?;
            let span = Span::new(start, operand.span().end);
            return Ok(Expression::Logic {
                op: LogicOp::Not,
                operands: vec![operand],
                span,
            });
        }
        if let Some(state) = state_kind(self.current().kind) {
            self.advance();
            let operand = self.parse_unary()?;
            let span = Span::new(start, operand.span().end);
            return Ok(Expression::State {
                state,
                operand: Box::new(operand),
                span,
            });
        }
        self.parse_chain()
    }

    /// Left-associative chain: `a OP b OP c` parses as `((a OP b) OP c)`.
    fn parse_chain(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.parse_postfix()?;
        while let Some(op) = chain_op(self.current().kind) {
            self.advance();
            let right = self.parse_postfix()?;
            let span = Span::new(left.span().start, right.span().end);
            left = Expression::Chain {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }
        Ok(left)
    }

    /// Postfix state (`Work✓`) and metadata suffix on an identifier.
    fn parse_postfix(&mut self) -> Result<Expression, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            if let Some(state) = state_kind(self.current().kind) {
                self.advance();
                let span = Span::new(expr.span().start, self.prev_end());
                expr = Expression::State {
                    state,
                    operand: Box::new(expr),
                    span,
                };
                continue;
            }
            if self.current().kind == TokenKind::StructMetadata {
                let body = self.current().bracket_inner().to_string();
                let token_end = self.current().span.end;
                if let Expression::Identifier { metadata, span, .. } = &mut expr {
                    if metadata.is_none() {
                        *metadata = Some(body);
                        *span = Span::new(span.start, token_end);
                        self.advance();
                        continue;
                    }
                }
            }
            break;
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Identifier | TokenKind::Path => {
                self.advance();
                Ok(Expression::Identifier {
                    name: token.text,
                    metadata: None,
                    span: token.span,
                })
            }
            TokenKind::Number => {
                self.advance();
                Ok(Expression::Number {
                    value: token.text.parse().unwrap_or(0.0),
                    text: token.text,
                    span: token.span,
                })
            }
            TokenKind::StructNote => {
                self.advance();
                Ok(Expression::Note {
                    body: token.bracket_inner().to_string(),
                    span: token.span,
                })
            }
            TokenKind::StructVariant => {
                self.advance();
                Ok(Expression::Variant {
                    body: token.bracket_inner().to_string(),
                    span: token.span,
                })
            }
            TokenKind::StructMetadata => {
                self.advance();
                Ok(Expression::Metadata {
                    body: token.bracket_inner().to_string(),
                    span: token.span,
                })
            }
            TokenKind::Newline | TokenKind::Eof => Err(ParseError::new(
                codes::EXPECTED_EXPRESSION,
                "Expected expression",
                token.span,
            )),
            _ => Err(ParseError::new(
                codes::UNEXPECTED_TOKEN,
                format!("Unexpected token '{}'", token.text),
                token.span,
            )),
        }
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Newline | TokenKind::Eof)
    }

    /// End position of the last consumed token.
    fn prev_end(&self) -> Position {
        if self.pos == 0 {
            self.current().span.start
        } else {
            self.tokens[self.pos - 1].span.end
        }
    }

    fn skip_newlines(&mut self) {
        while self.current().kind == TokenKind::Newline {
            self.advance();
        }
    }

    fn consume_to_line_end(&mut self) {
        while !self.at_line_end() {
            self.advance();
        }
    }

    /// Source text from the current token to the end of the line, trimmed.
    /// The returned position is where consumption stopped.
    fn rest_of_line(&mut self) -> (String, Position) {
        let start = self.current().span.start.offset;
        self.consume_to_line_end();
        let end = self.current().span.start.offset.min(self.source.len());
        let text = self.source[start.min(end)..end].trim().to_string();
        (text, self.prev_end())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.current().kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                codes::UNEXPECTED_TOKEN,
                format!("Expected {:?}, found '{}'", kind, self.current().text),
                self.current().span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if self.current().kind == TokenKind::Identifier {
            let text = self.current().text.clone();
            self.advance();
            Ok(text)
        } else {
            Err(ParseError::new(
                codes::EXPECTED_IDENTIFIER,
                format!("Expected identifier, found '{}'", self.current().text),
                self.current().span,
            ))
        }
    }

    /// Recovery: discard tokens until past the next newline or until a token
    /// that can begin a statement. Statement dispatch always consumes at
    /// least one token, so stopping on a starter cannot loop.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            match self.current().kind {
                TokenKind::Newline => {
                    self.advance();
                    return;
                }
                TokenKind::MetaVersion
                | TokenKind::StructSection
                | TokenKind::LinkFeature
                | TokenKind::LinkTask
                | TokenKind::AnchorEntry
                | TokenKind::AnchorHotspot
                | TokenKind::AnchorBoundary
                | TokenKind::HeatCritical
                | TokenKind::HeatStable
                | TokenKind::HeatVolatile
                | TokenKind::HeatHot
                | TokenKind::DecisionDate
                | TokenKind::IntentModule => return,
                _ => self.advance(),
            }
        }
    }
}

fn state_kind(kind: TokenKind) -> Option<StateKind> {
    match kind {
        TokenKind::StateComplete => Some(StateKind::Complete),
        TokenKind::StateFailed => Some(StateKind::Failed),
        TokenKind::StateCritical => Some(StateKind::Critical),
        TokenKind::StateActive => Some(StateKind::Active),
        _ => None,
    }
}

fn chain_op(kind: TokenKind) -> Option<ChainOp> {
    match kind {
        TokenKind::RelationDefines => Some(ChainOp::Defines),
        TokenKind::RelationLeadsTo => Some(ChainOp::LeadsTo),
        TokenKind::RelationFrom => Some(ChainOp::From),
        TokenKind::RelationMutual => Some(ChainOp::Mutual),
        TokenKind::RelationAnd => Some(ChainOp::And),
        TokenKind::RelationRemove => Some(ChainOp::Remove),
        _ => None,
    }
}

// ============================================================================
// List item parsing
// ============================================================================

/// Split list text on commas at the top level: brackets and quotes shield
/// their contents.
fn split_top_level(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut in_quote: Option<char> = None;
    let mut current = String::new();

    for c in inner.chars() {
        if let Some(q) = in_quote {
            current.push(c);
            if c == closing_quote(q) {
                in_quote = None;
            }
            continue;
        }
        match c {
            '"' | '\u{201C}' | '\u{2018}' | '\'' => {
                in_quote = Some(c);
                current.push(c);
            }
            '{' | '[' | '(' | '<' => {
                depth += 1;
                current.push(c);
            }
            '}' | ']' | ')' | '>' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                items.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() || !items.is_empty() {
        items.push(current);
    }
    items
}

fn closing_quote(open: char) -> char {
    match open {
        '\u{201C}' => '\u{201D}',
        '\u{2018}' => '\u{2019}',
        other => other,
    }
}

/// Strip one layer of straight or curly quotes.
fn strip_quotes(item: &str) -> &str {
    let item = item.trim();
    for (open, close) in [
        ('"', '"'),
        ('\'', '\''),
        ('\u{201C}', '\u{201D}'),
        ('\u{2018}', '\u{2019}'),
    ] {
        if item.len() >= open.len_utf8() + close.len_utf8()
            && item.starts_with(open)
            && item.ends_with(close)
        {
            return &item[open.len_utf8()..item.len() - close.len_utf8()];
        }
    }
    item
}

/// One item of a file list: `path`, optional `{TO-CREATE}`/`{TO-MODIFY}`
/// marker, optional `:start-end` line range, in either order of mention.
fn parse_file_item(raw: &str) -> FileRef {
    let mut item = strip_quotes(raw.trim()).trim().to_string();
    let mut marker = None;

    if item.ends_with('}') {
        if let Some(open) = item.rfind('{') {
            if let Some(parsed) = FileMarker::parse(&item[open + 1..item.len() - 1]) {
                marker = Some(parsed);
                item.truncate(open);
                item = item.trim_end().to_string();
            }
        }
    }

    let mut line_range = None;
    if let Some(colon) = item.rfind(':') {
        if let Some(range) = parse_line_range(&item[colon + 1..]) {
            line_range = Some(range);
            item.truncate(colon);
        }
    }

    FileRef {
        is_glob: mbel_core::path_is_glob(&item),
        path: item,
        marker,
        line_range,
    }
}

/// `start-end` with both sides ASCII digits.
fn parse_line_range(text: &str) -> Option<LineRange> {
    let (start, end) = text.split_once('-')?;
    if start.is_empty() || end.is_empty() {
        return None;
    }
    if !start.bytes().all(|b| b.is_ascii_digit()) || !end.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(LineRange {
        start: start.parse().ok()?,
        end: end.parse().ok()?,
    })
}
