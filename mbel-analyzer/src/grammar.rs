//! Grammar checks: article usage, identifier casing, Unicode typography.

use crate::text::LineIndex;
use crate::{fence_ranges, inside_any, Analysis};
use mbel_core::{codes, Diagnostic, QuickFix, Severity, TextEdit};
use mbel_syntax::{Expression, ParseResult, Statement, TokenKind, ARROW_KEYWORDS};
use once_cell::sync::Lazy;
use regex::Regex;

static ARTICLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(the|an|a)\b").unwrap());

pub fn check(result: &ParseResult, index: &LineIndex, analysis: &mut Analysis) {
    let fences = fence_ranges(result);
    check_articles(&result.source, &fences, index, analysis);
    check_identifier_casing(result, analysis);
    check_typography(&result.source, &fences, index, analysis);
    check_operator_words(result, analysis);
}

/// Standalone English articles have no place in the notation; everything is
/// shorter without them.
fn check_articles(source: &str, fences: &[(usize, usize)], index: &LineIndex, analysis: &mut Analysis) {
    for m in ARTICLE_RE.find_iter(source) {
        if inside_any(fences, m.start()) {
            continue;
        }
        // Only standalone words: bounded by whitespace or line edges, so
        // path segments like `src/a.ts` stay untouched.
        let before_ok = source[..m.start()]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        let after = source[m.end()..].chars().next();
        let after_ok = after.map_or(true, char::is_whitespace);
        if !before_ok || !after_ok {
            continue;
        }

        let span = index.span(m.start(), m.end());
        // The fix also eats the following space.
        let delete_end = if after == Some(' ') { m.end() + 1 } else { m.end() };
        let fix = QuickFix::preferred(
            format!("Remove article '{}'", m.as_str()),
            vec![TextEdit::delete(index.span(m.start(), delete_end))],
        );
        analysis.push_with_fix(
            Diagnostic::new(
                span,
                Severity::Warning,
                codes::ARTICLE_USAGE,
                format!("Standalone article '{}' adds no meaning", m.as_str()),
            ),
            fix,
        );
    }
}

/// Identifiers are camelCase by convention; underscores flag imported
/// naming.
fn check_identifier_casing(result: &ParseResult, analysis: &mut Analysis) {
    for token in &result.tokens {
        if token.kind != TokenKind::Identifier || !token.text.contains('_') {
            continue;
        }
        let fix = QuickFix::new(
            format!("Rename to '{}'", to_camel_case(&token.text)),
            vec![TextEdit::replace(token.span, to_camel_case(&token.text))],
        );
        analysis.push_with_fix(
            Diagnostic::new(
                token.span,
                Severity::Warning,
                codes::NON_CAMEL_CASE,
                format!("Identifier '{}' is not camelCase", token.text),
            ),
            fix,
        );
    }
}

fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Typography substitutions introduced by word processors. Plain `→ ← ↔`
/// are legitimate relation operators; they are flagged only where an ASCII
/// arrow clause was clearly intended, i.e. immediately before a recognized
/// arrow keyword.
fn check_typography(
    source: &str,
    fences: &[(usize, usize)],
    index: &LineIndex,
    analysis: &mut Analysis,
) {
    for (offset, c) in source.char_indices() {
        if inside_any(fences, offset) {
            continue;
        }
        let after = &source[offset + c.len_utf8()..];
        let (code, replacement, description): (&str, &str, &str) = match c {
            '→' if followed_by_arrow_keyword(after) => {
                (codes::TYPO_ARROW_RIGHT, "->", "arrow")
            }
            '←' if followed_by_arrow_keyword(after) => {
                (codes::TYPO_ARROW_LEFT, "<-", "arrow")
            }
            '↔' if followed_by_arrow_keyword(after) => {
                (codes::TYPO_ARROW_BOTH, "<->", "arrow")
            }
            '⇒' => (codes::TYPO_DOUBLE_ARROW, "->", "arrow"),
            '—' => (codes::TYPO_EM_DASH, "-", "em-dash"),
            '–' => (codes::TYPO_EN_DASH, "-", "en-dash"),
            '\u{201C}' => (codes::TYPO_CURLY_DOUBLE_OPEN, "\"", "curly quote"),
            '\u{201D}' => (codes::TYPO_CURLY_DOUBLE_CLOSE, "\"", "curly quote"),
            '\u{2018}' => (codes::TYPO_CURLY_SINGLE_OPEN, "'", "curly quote"),
            '\u{2019}' => (codes::TYPO_CURLY_SINGLE_CLOSE, "'", "curly quote"),
            '…' => (codes::TYPO_ELLIPSIS, "...", "ellipsis"),
            '\u{00A0}' => (codes::TYPO_NBSP, " ", "non-breaking space"),
            _ => continue,
        };

        let span = index.span(offset, offset + c.len_utf8());
        let fix = QuickFix::preferred(
            format!("Replace {description} with '{replacement}'"),
            vec![TextEdit::replace(span, replacement)],
        );
        analysis.push_with_fix(
            Diagnostic::new(
                span,
                Severity::Error,
                code,
                format!("Unicode {description} '{c}'; use '{replacement}'"),
            ),
            fix,
        );
    }
}

fn followed_by_arrow_keyword(after: &str) -> bool {
    let word_len = after
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after.len());
    ARROW_KEYWORDS.contains(&&after[..word_len])
}

/// The notation has operators for and/or/not; spelled-out words are a hint
/// that the author forgot them.
fn check_operator_words(result: &ParseResult, analysis: &mut Analysis) {
    for statement in &result.document.statements {
        if let Statement::Expression(expression) = statement {
            visit_operator_words(&expression.expression, analysis);
        }
    }
}

fn visit_operator_words(expression: &Expression, analysis: &mut Analysis) {
    match expression {
        Expression::Identifier { name, span, .. } => {
            let replacement = match name.as_str() {
                "and" => "&",
                "or" => "||",
                "not" => "¬",
                _ => return,
            };
            let fix = QuickFix::new(
                format!("Replace with '{replacement}'"),
                vec![TextEdit::replace(*span, replacement)],
            );
            analysis.push_with_fix(
                Diagnostic::new(
                    *span,
                    Severity::Hint,
                    codes::PREFER_OPERATOR,
                    format!("Prefer operator '{replacement}' over word '{name}'"),
                ),
                fix,
            );
        }
        Expression::Chain { left, right, .. } => {
            visit_operator_words(left, analysis);
            visit_operator_words(right, analysis);
        }
        Expression::Logic { operands, .. } => {
            for operand in operands {
                visit_operator_words(operand, analysis);
            }
        }
        Expression::State { operand, .. } => visit_operator_words(operand, analysis),
        _ => {}
    }
}
