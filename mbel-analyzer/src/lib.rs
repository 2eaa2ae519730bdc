//! MBEL Analyzer - Diagnostics and Quick Fixes
//!
//! Runs three families of checks over a parse result, each independently
//! toggleable:
//!
//! - grammar: article usage, identifier casing, Unicode typography
//! - semantic: version header, sections, attributes, and the per-declaration
//!   validation rules for links, anchors, decisions, heat, and intents
//! - brackets: unclosed-bracket findings derived from the token stream
//!
//! Lexer and parser errors are re-emitted as diagnostics, de-duplicated by
//! position. All state lives for one analysis call; nothing is cached
//! between calls.

mod brackets;
mod grammar;
mod semantic;
mod text;

use mbel_core::{codes, Diagnostic, QuickFix, Severity};
use mbel_syntax::{parse, ParseResult, TokenKind};
use std::collections::{HashMap, HashSet};

pub use text::LineIndex;

/// Which check families run.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerOptions {
    pub grammar: bool,
    pub semantic: bool,
    pub brackets: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            grammar: true,
            semantic: true,
            brackets: true,
        }
    }
}

/// The outcome of one analysis: diagnostics in discovery order plus the
/// quick fixes keyed by diagnostic identity.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub diagnostics: Vec<Diagnostic>,
    quick_fixes: HashMap<String, Vec<QuickFix>>,
}

impl Analysis {
    /// The fixes registered for a diagnostic, possibly empty.
    pub fn quick_fixes_for(&self, diagnostic: &Diagnostic) -> &[QuickFix] {
        self.quick_fixes
            .get(&diagnostic.key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn push_with_fix(&mut self, diagnostic: Diagnostic, fix: QuickFix) {
        self.quick_fixes
            .entry(diagnostic.key())
            .or_default()
            .push(fix);
        self.diagnostics.push(diagnostic);
    }
}

/// The analyzer. Stateless apart from its options; every call builds its
/// own working set.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalyzerOptions,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    /// Parse and analyze in one step.
    pub fn analyze_text(&self, source: &str) -> Analysis {
        self.analyze(&parse(source))
    }

    /// Analyze an existing parse result.
    pub fn analyze(&self, result: &ParseResult) -> Analysis {
        let mut analysis = Analysis::default();
        let index = LineIndex::new(&result.source);

        self.reemit_errors(result, &mut analysis);
        if self.options.brackets {
            brackets::check(result, &mut analysis);
        }
        if self.options.grammar {
            grammar::check(result, &index, &mut analysis);
        }
        if self.options.semantic {
            semantic::check(result, &mut analysis);
        }

        tracing::debug!(
            diagnostics = analysis.diagnostics.len(),
            "analysis complete"
        );
        analysis
    }

    /// Lexer and parser errors become `error`-severity diagnostics. Unclosed
    /// brackets are owned by the bracket check (which attaches quick fixes),
    /// and parse errors landing on a lexer error position are dropped.
    fn reemit_errors(&self, result: &ParseResult, analysis: &mut Analysis) {
        let mut lexer_positions: HashSet<usize> = HashSet::new();

        for error in &result.lex_errors {
            lexer_positions.insert(error.span.start.offset);
            if is_unclosed_code(&error.code) && self.options.brackets {
                continue;
            }
            analysis.push(Diagnostic::new(
                error.span,
                Severity::Error,
                &error.code,
                error.message.clone(),
            ));
        }

        for error in &result.parse_errors {
            if lexer_positions.contains(&error.span.start.offset) {
                continue;
            }
            analysis.push(Diagnostic::new(
                error.span,
                Severity::Error,
                &error.code,
                error.message.clone(),
            ));
        }
    }
}

fn is_unclosed_code(code: &str) -> bool {
    matches!(
        code,
        codes::UNCLOSED_SECTION
            | codes::UNCLOSED_LIST
            | codes::UNCLOSED_METADATA
            | codes::UNCLOSED_NOTE
            | codes::UNCLOSED_VARIANT
    )
}

/// Byte ranges of code-fence tokens; text checks skip these.
fn fence_ranges(result: &ParseResult) -> Vec<(usize, usize)> {
    result
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::CodeFence)
        .map(|t| (t.span.start.offset, t.span.end.offset))
        .collect()
}

fn inside_any(ranges: &[(usize, usize)], offset: usize) -> bool {
    ranges.iter().any(|&(s, e)| offset >= s && offset < e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes_of(analysis: &Analysis) -> Vec<&str> {
        analysis.diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    #[test]
    fn clean_document_has_no_diagnostics() {
        let analyzer = Analyzer::new();
        let analysis = analyzer.analyze_text(
            "§MBEL:5.0\n[FOCUS]\n@feature{Lexer}->files[src/lexer.ts]->tests[tests/lexer.test.ts]\n",
        );
        assert!(
            analysis.diagnostics.is_empty(),
            "unexpected: {:?}",
            analysis.diagnostics
        );
    }

    #[test]
    fn toggles_disable_check_families() {
        let source = "§MBEL:5.0\nthe parser_name\n";
        let all = Analyzer::new().analyze_text(source);
        assert!(codes_of(&all).contains(&codes::ARTICLE_USAGE));
        assert!(codes_of(&all).contains(&codes::NON_CAMEL_CASE));

        let quiet = Analyzer::with_options(AnalyzerOptions {
            grammar: false,
            ..Default::default()
        })
        .analyze_text(source);
        assert!(!codes_of(&quiet).contains(&codes::ARTICLE_USAGE));
        assert!(!codes_of(&quiet).contains(&codes::NON_CAMEL_CASE));
    }

    #[test]
    fn unknown_character_reemitted_once() {
        let analysis = Analyzer::new().analyze_text("§MBEL:5.0\na ; b\n");
        let unknown: Vec<_> = analysis
            .diagnostics
            .iter()
            .filter(|d| d.code == codes::UNKNOWN_CHARACTER)
            .collect();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].severity, Severity::Error);
    }

    #[test]
    fn analysis_is_deterministic() {
        let source = "[A]\n[A]\n@feature{X}->depends[Y]\nthe end\n";
        let a = Analyzer::new().analyze_text(source);
        let b = Analyzer::new().analyze_text(source);
        assert_eq!(a.diagnostics, b.diagnostics);
    }
}
