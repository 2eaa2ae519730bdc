//! Lexer implementation

use super::token::*;
use mbel_core::{codes, Position, Span};
use std::iter::Peekable;
use std::str::CharIndices;

// ============================================================================
// LEXER IMPLEMENTATION
// ============================================================================

/// Lexer for the MBEL notation.
///
/// Scanning is contextual in two narrow ways, both one-shot booleans:
/// `list_follows` marks that the previous token was an arrow keyword, so the
/// next `[...]` is a list rather than a section; `path_follows` marks that an
/// anchor or heat prefix was just emitted, so the following non-whitespace
/// run is a single path token. Both reset on the next emitted token.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    pos: usize,
    errors: Vec<LexError>,
    list_follows: bool,
    path_follows: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            pos: 0,
            errors: Vec::new(),
            list_follows: false,
            path_follows: false,
        }
    }

    /// Tokenize the entire source. Errors are non-fatal; the token stream is
    /// always terminated by an `Eof` token.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<LexError>) {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            self.list_follows = token.kind == TokenKind::ArrowKeyword;
            if matches!(token.kind, TokenKind::Newline | TokenKind::Eof | TokenKind::Path) {
                self.path_follows = false;
            }
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tracing::trace!(tokens = tokens.len(), errors = self.errors.len(), "lexed source");
        (tokens, self.errors)
    }

    /// Get the next token from the source.
    fn next_token(&mut self) -> Token {
        self.skip_inline_whitespace();

        let start = self.position();

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some('\r') => {
                self.advance();
                if self.peek_char() == Some('\n') {
                    self.advance();
                }
                TokenKind::Newline
            }
            Some('\n') => {
                self.advance();
                TokenKind::Newline
            }
            Some(c) if self.path_follows && !c.is_whitespace() => self.scan_path(),
            Some('`') if self.rest().starts_with("```") => self.scan_code_fence(start),
            Some('[') => {
                let kind = if self.list_follows {
                    TokenKind::StructList
                } else {
                    TokenKind::StructSection
                };
                let code = if self.list_follows {
                    codes::UNCLOSED_LIST
                } else {
                    codes::UNCLOSED_SECTION
                };
                self.scan_bracket('[', ']', code, start);
                kind
            }
            Some('{') => {
                self.scan_bracket('{', '}', codes::UNCLOSED_METADATA, start);
                TokenKind::StructMetadata
            }
            Some('(') => {
                self.scan_bracket('(', ')', codes::UNCLOSED_NOTE, start);
                TokenKind::StructNote
            }
            Some('<') => {
                self.scan_bracket('<', '>', codes::UNCLOSED_VARIANT, start);
                TokenKind::StructVariant
            }
            Some(':') => {
                self.advance();
                if self.peek_char() == Some(':') {
                    self.advance();
                }
                TokenKind::RelationDefines
            }
            Some('|') => {
                self.advance();
                if self.peek_char() == Some('|') {
                    self.advance();
                    TokenKind::LogicOr
                } else {
                    TokenKind::StructOr
                }
            }
            Some('@') => self.scan_at_prefix(),
            Some('-') => self.scan_dash(),
            Some('>') => self.single(TokenKind::TemporalPast),
            Some('?') => self.single(TokenKind::TemporalFuture),
            Some('≈') => self.single(TokenKind::TemporalApprox),
            Some('✓') => self.single(TokenKind::StateComplete),
            Some('✗') => self.single(TokenKind::StateFailed),
            Some('!') => self.single(TokenKind::StateCritical),
            Some('⚡') => self.single(TokenKind::StateActive),
            Some('→') => self.single(TokenKind::RelationLeadsTo),
            Some('←') => self.single(TokenKind::RelationFrom),
            Some('↔') => self.single(TokenKind::RelationMutual),
            Some('+') => self.single(TokenKind::RelationAnd),
            Some('#') => self.single(TokenKind::QuantCount),
            Some('%') => self.single(TokenKind::QuantPercent),
            Some('~') => self.single(TokenKind::QuantApprox),
            Some('&') => self.single(TokenKind::LogicAnd),
            Some('¬') => self.single(TokenKind::LogicNot),
            Some('©') => self.single(TokenKind::MetaSource),
            Some('§') => self.single(TokenKind::MetaVersion),
            Some(c) if is_typography(c) => {
                // Typography substitutions never panic the lexer; the
                // analyzer owns the MBEL-TYPO diagnostics for these.
                self.advance();
                TokenKind::Unknown
            }
            Some(c) if c.is_ascii_digit() => self.scan_number(start),
            Some(c) if is_ident_start(c) => self.scan_identifier(),
            Some(c) => {
                self.advance();
                self.error(
                    codes::UNKNOWN_CHARACTER,
                    format!("Unknown character '{c}'"),
                    start,
                );
                TokenKind::Unknown
            }
        };

        self.make_token(kind, start)
    }

    // ========================================================================
    // Scanners
    // ========================================================================

    /// Balanced bracket scan. Nested same-kind openers are included in the
    /// token text. Scanning stops at end-of-line: an unterminated bracket
    /// emits the partial token plus an "Unclosed" error at the opener.
    fn scan_bracket(&mut self, open: char, close: char, code: &str, start: Position) {
        self.advance(); // opener
        let mut depth = 1usize;

        loop {
            match self.peek_char() {
                None | Some('\n') | Some('\r') => {
                    self.error(code, format!("Unclosed {open}"), start);
                    break;
                }
                Some(c) if c == open => {
                    depth += 1;
                    self.advance();
                }
                Some(c) if c == close => {
                    depth -= 1;
                    self.advance();
                    if depth == 0 {
                        break;
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Triple-backtick fence: one token up to and including the next fence,
    /// or to end of input.
    fn scan_code_fence(&mut self, start: Position) -> TokenKind {
        self.consume_ascii(3); // ```
        loop {
            if self.rest().starts_with("```") {
                self.consume_ascii(3);
                return TokenKind::CodeFence;
            }
            if self.advance().is_none() {
                self.error(codes::UNCLOSED_CODE_FENCE, "Unclosed code fence", start);
                return TokenKind::CodeFence;
            }
        }
    }

    /// `@` begins links, anchors, heat markers, decision dates, intent
    /// modules, or the plain temporal-present operator. Dispatch is by
    /// longest recognizable prefix of the remaining input.
    fn scan_at_prefix(&mut self) -> TokenKind {
        let rest = &self.rest()[1..]; // after '@'

        if starts_with_word(rest, "feature") {
            self.consume_ascii(1 + "feature".len());
            return TokenKind::LinkFeature;
        }
        if starts_with_word(rest, "task") {
            self.consume_ascii(1 + "task".len());
            return TokenKind::LinkTask;
        }
        // `hotspot::` must be probed before `hot::`
        for (prefix, kind) in [
            ("entry::", TokenKind::AnchorEntry),
            ("hotspot::", TokenKind::AnchorHotspot),
            ("boundary::", TokenKind::AnchorBoundary),
            ("critical::", TokenKind::HeatCritical),
            ("stable::", TokenKind::HeatStable),
            ("volatile::", TokenKind::HeatVolatile),
            ("hot::", TokenKind::HeatHot),
        ] {
            if rest.starts_with(prefix) {
                self.consume_ascii(1 + prefix.len());
                self.path_follows = true;
                return kind;
            }
        }
        if is_date_prefix(rest) {
            self.consume_ascii(1 + 10 + 2); // @YYYY-MM-DD::
            return TokenKind::DecisionDate;
        }
        if let Some(module_len) = intent_module_len(rest) {
            self.consume_ascii(1 + module_len + 2); // @Module::
            return TokenKind::IntentModule;
        }

        self.advance();
        TokenKind::TemporalPresent
    }

    /// `->keyword` when the keyword is in the closed set; otherwise a plain
    /// `-` relation operator. Whitespace between `->` and the keyword
    /// disqualifies the match, which falls out naturally from slicing the
    /// raw remainder.
    fn scan_dash(&mut self) -> TokenKind {
        let rest = self.rest();
        if let Some(after_arrow) = rest.strip_prefix("->") {
            let word_len = after_arrow
                .find(|c: char| !c.is_ascii_alphanumeric())
                .unwrap_or(after_arrow.len());
            let word = &after_arrow[..word_len];
            if ARROW_KEYWORDS.contains(&word) {
                self.consume_ascii(2 + word_len);
                return TokenKind::ArrowKeyword;
            }
        }
        self.advance();
        TokenKind::RelationRemove
    }

    /// Path run after an anchor/heat prefix: everything up to whitespace,
    /// end of line, or an attached `->` clause.
    fn scan_path(&mut self) -> TokenKind {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                break;
            }
            if c == '-' && self.rest().starts_with("->") {
                break;
            }
            self.advance();
        }
        self.path_follows = false;
        TokenKind::Path
    }

    /// Scan an identifier.
    fn scan_identifier(&mut self) -> TokenKind {
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Identifier
    }

    /// Scan a number: ASCII digits with an optional `.digits` fraction.
    fn scan_number(&mut self, start: Position) -> TokenKind {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek_char() == Some('.') && self.peek_next_char().is_some_and(|c| c.is_ascii_digit())
        {
            self.advance(); // .
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        // A trailing identifier glued to the digits is not a number.
        if self.peek_char().is_some_and(is_ident_start) {
            while self.peek_char().is_some_and(is_ident_continue) {
                self.advance();
            }
            let text = &self.source[start.offset..self.pos];
            self.error(codes::INVALID_NUMBER, format!("Invalid number '{text}'"), start);
            return TokenKind::Unknown;
        }
        TokenKind::Number
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn make_token(&self, kind: TokenKind, start: Position) -> Token {
        Token {
            kind,
            text: self.source[start.offset..self.pos].to_string(),
            span: Span::new(start, self.position()),
        }
    }

    fn error(&mut self, code: &str, message: impl Into<String>, at: Position) {
        self.errors.push(LexError {
            code: code.to_string(),
            message: message.into(),
            span: Span::new(at, self.position()),
        });
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column, self.pos)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(' ') | Some('\t')) {
            self.advance();
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((i, c)) = self.chars.next() {
            self.pos = i + c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    /// Advance over `n` bytes of known-ASCII input.
    fn consume_ascii(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }
}

/// Tokenize a source string. Convenience wrapper over [`Lexer`].
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<LexError>) {
    Lexer::new(source).tokenize()
}

// ============================================================================
// Character classes
// ============================================================================

/// Operators above U+007F. These are excluded from identifiers.
fn is_unicode_operator(c: char) -> bool {
    matches!(c, '≈' | '✓' | '✗' | '⚡' | '→' | '←' | '↔' | '¬' | '©' | '§')
}

/// Typography substitutions that word processors introduce. Tokenized as
/// `Unknown` without a lexer error; the analyzer owns their diagnostics.
fn is_typography(c: char) -> bool {
    matches!(
        c,
        '⇒' | '—' | '–' | '\u{201C}' | '\u{201D}' | '\u{2018}' | '\u{2019}' | '…' | '\u{00A0}'
    )
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c == '_'
        || ((c as u32) > 0x7F && !is_unicode_operator(c) && !is_typography(c) && !c.is_whitespace())
}

fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

/// `YYYY-MM-DD::` at the start of `rest`.
fn is_date_prefix(rest: &str) -> bool {
    let b = rest.as_bytes();
    if b.len() < 12 {
        return false;
    }
    b[0..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
        && &b[10..12] == b"::"
}

/// Byte length of `Module` when `rest` starts with `Module::component`,
/// `Module` beginning with an uppercase ASCII letter. This is what separates
/// an intent prefix from the temporal-present operator.
fn intent_module_len(rest: &str) -> Option<usize> {
    let first = rest.chars().next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    let len = rest
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(rest.len());
    let after = &rest[len..];
    if !after.starts_with("::") {
        return None;
    }
    let component = after[2..].chars().next()?;
    if is_ident_start(component) {
        Some(len)
    } else {
        None
    }
}

/// `word` at the start of `rest`, not immediately continued by an
/// identifier character.
fn starts_with_word(rest: &str, word: &str) -> bool {
    rest.starts_with(word)
        && !rest[word.len()..]
            .chars()
            .next()
            .is_some_and(is_ident_continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_the_core_operator_set() {
        use TokenKind::*;
        let (tokens, errors) = tokenize("§MBEL:5.0\n[FOCUS]\n@active::Work✓");
        assert!(errors.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MetaVersion,
                Identifier,
                RelationDefines,
                Number,
                Newline,
                StructSection,
                Newline,
                TemporalPresent,
                Identifier,
                RelationDefines,
                Identifier,
                StateComplete,
                Eof,
            ]
        );
        assert_eq!(tokens[5].text, "[FOCUS]");
        assert_eq!(tokens[8].text, "active");
        assert_eq!(tokens[10].text, "Work");
    }

    #[test]
    fn arrow_keyword_requires_adjacency() {
        let (tokens, _) = tokenize("->files");
        assert_eq!(tokens[0].kind, TokenKind::ArrowKeyword);
        assert_eq!(tokens[0].arrow_keyword(), Some("files"));

        // whitespace between -> and keyword disqualifies the match
        let (tokens, _) = tokenize("-> files");
        assert_eq!(tokens[0].kind, TokenKind::RelationRemove);
        assert_eq!(tokens[1].kind, TokenKind::TemporalPast);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn arrow_keyword_is_case_sensitive() {
        let (tokens, _) = tokenize("->Files");
        assert_eq!(tokens[0].kind, TokenKind::RelationRemove);
    }

    #[test]
    fn list_follows_arrow_but_section_does_not() {
        let (tokens, _) = tokenize("->files[src/a.ts,src/b.ts]");
        assert_eq!(tokens[1].kind, TokenKind::StructList);
        assert_eq!(tokens[1].text, "[src/a.ts,src/b.ts]");

        let (tokens, _) = tokenize("[FOCUS]");
        assert_eq!(tokens[0].kind, TokenKind::StructSection);
    }

    #[test]
    fn unclosed_section_emits_partial_token_and_error() {
        let (tokens, errors) = tokenize("[unclosed\n@x::y");
        assert_eq!(tokens[0].kind, TokenKind::StructSection);
        assert_eq!(tokens[0].text, "[unclosed");
        assert!(!tokens[0].bracket_closed());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::UNCLOSED_SECTION);
        assert_eq!(errors[0].message, "Unclosed [");
        assert_eq!(errors[0].span.start, mbel_core::Position::new(1, 1, 0));
        // lexing continues on the next line
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[2].kind, TokenKind::TemporalPresent);
    }

    #[test]
    fn nested_metadata_is_balanced() {
        let (tokens, errors) = tokenize("{outer {inner} more}");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::StructMetadata);
        assert_eq!(tokens[0].text, "{outer {inner} more}");
    }

    #[test]
    fn link_and_prefix_tokens() {
        use TokenKind::*;
        assert_eq!(kinds("@feature{Lexer}")[..2], [LinkFeature, StructMetadata]);
        assert_eq!(kinds("@task{T1}")[..2], [LinkTask, StructMetadata]);
        assert_eq!(kinds("@entry::src/index.ts")[..2], [AnchorEntry, Path]);
        assert_eq!(kinds("@hotspot::src/parser.ts")[..2], [AnchorHotspot, Path]);
        assert_eq!(kinds("@critical::src/x.ts")[..2], [HeatCritical, Path]);
        assert_eq!(kinds("@hot::src/y.ts")[..2], [HeatHot, Path]);
    }

    #[test]
    fn decision_and_intent_prefixes() {
        let (tokens, _) = tokenize("@2024-01-15::UseAdjacencyLists");
        assert_eq!(tokens[0].kind, TokenKind::DecisionDate);
        assert_eq!(tokens[0].decision_date(), Some("2024-01-15"));
        assert_eq!(tokens[1].kind, TokenKind::Identifier);

        let (tokens, _) = tokenize("@Parser::tokenize");
        assert_eq!(tokens[0].kind, TokenKind::IntentModule);
        assert_eq!(tokens[0].intent_module(), Some("Parser"));
        assert_eq!(tokens[1].text, "tokenize");
    }

    #[test]
    fn lowercase_double_colon_is_not_an_intent() {
        // `@active::Work` - lowercase initial means temporal-present
        let (tokens, _) = tokenize("@active::Work");
        assert_eq!(tokens[0].kind, TokenKind::TemporalPresent);
    }

    #[test]
    fn path_stops_at_attached_arrow_clause() {
        let (tokens, _) = tokenize("@entry::src/index.ts->descrizione::Main");
        assert_eq!(tokens[1].kind, TokenKind::Path);
        assert_eq!(tokens[1].text, "src/index.ts");
        assert_eq!(tokens[2].kind, TokenKind::ArrowKeyword);
    }

    #[test]
    fn crlf_is_one_newline_token() {
        let (tokens, _) = tokenize("a\r\nb");
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
        assert_eq!(tokens[2].span.start.line, 2);
    }

    #[test]
    fn unknown_character_is_non_fatal() {
        let (tokens, errors) = tokenize("a ; b");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::UNKNOWN_CHARACTER);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn typography_lexes_without_lexer_error() {
        let (tokens, errors) = tokenize("a ⇒ b — c");
        assert!(errors.is_empty());
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[3].kind, TokenKind::Unknown);
    }

    #[test]
    fn unicode_arrows_lex_as_relations() {
        use TokenKind::*;
        assert_eq!(kinds("a→b"), vec![Identifier, RelationLeadsTo, Identifier, Eof]);
        assert_eq!(kinds("a←b"), vec![Identifier, RelationFrom, Identifier, Eof]);
        assert_eq!(kinds("a↔b"), vec![Identifier, RelationMutual, Identifier, Eof]);
    }

    #[test]
    fn code_fence_is_one_token() {
        let (tokens, errors) = tokenize("```\nlet x = [1];\n```\nafter");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::CodeFence);
        assert!(tokens[0].text.ends_with("```"));
        assert_eq!(tokens[2].text, "after");
    }

    #[test]
    fn numbers_and_invalid_numbers() {
        let (tokens, errors) = tokenize("3.14");
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert!(errors.is_empty());

        let (tokens, errors) = tokenize("5x");
        assert_eq!(tokens[0].kind, TokenKind::Unknown);
        assert_eq!(errors[0].code, codes::INVALID_NUMBER);
    }

    #[test]
    fn logic_and_quantifier_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("a & b || ¬c"),
            vec![Identifier, LogicAnd, Identifier, LogicOr, LogicNot, Identifier, Eof]
        );
        assert_eq!(kinds("#5 %80 ~3"), vec![
            QuantCount, Number, QuantPercent, Number, QuantApprox, Number, Eof
        ]);
    }

    #[test]
    fn positions_are_utf8_offsets() {
        let source = "✓ok";
        let (tokens, _) = tokenize(source);
        assert_eq!(tokens[0].span.start.offset, 0);
        assert_eq!(tokens[0].span.end.offset, '✓'.len_utf8());
        assert_eq!(tokens[1].span.start.offset, '✓'.len_utf8());
        assert_eq!(tokens[1].span.end.offset, source.len());
    }
}
