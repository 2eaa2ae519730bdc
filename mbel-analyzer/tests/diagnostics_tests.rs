//! End-to-end diagnostic behavior over realistic memory-bank sources.

use mbel_analyzer::Analyzer;
use mbel_core::{codes, Severity};

#[test]
fn clean_memory_bank_is_silent() {
    let source = "\
§MBEL:5.0
[ARCHITECTURE]
@feature{Lexer}->files[src/lexer.ts]->tests[tests/lexer.test.ts]
@feature{Parser}->files[src/parser.ts]->tests[tests/parser.test.ts]->depends[Lexer]
@entry::src/index.ts
  ->description::Main entry point
@2024-01-15::UseAdjacencyLists
  ->status::ACTIVE
  ->reason::avoids cyclic ownership
";
    let analysis = Analyzer::new().analyze_text(source);
    assert!(
        analysis.diagnostics.is_empty(),
        "expected silence, got {:?}",
        analysis.diagnostics
    );
}

#[test]
fn unclosed_section_recovers_and_offers_fix() {
    let source = "[unclosed\n@x::y\n";
    let analysis = Analyzer::new().analyze_text(source);

    let unclosed = analysis
        .diagnostics
        .iter()
        .find(|d| d.code == codes::UNCLOSED_SECTION)
        .expect("unclosed section diagnostic");
    assert_eq!(unclosed.severity, Severity::Error);
    assert_eq!(unclosed.range.start.line, 1);
    assert_eq!(unclosed.range.start.column, 1);

    let fixes = analysis.quick_fixes_for(unclosed);
    assert_eq!(fixes.len(), 1);
    assert!(fixes[0].is_preferred);
    assert_eq!(fixes[0].edits[0].new_text, "]");
}

#[test]
fn article_fix_removes_word_and_space() {
    let source = "the parser is fast";
    let analysis = Analyzer::new().analyze_text(source);

    let article = analysis
        .diagnostics
        .iter()
        .find(|d| d.code == codes::ARTICLE_USAGE)
        .expect("article diagnostic");
    assert_eq!(article.severity, Severity::Warning);
    assert_eq!(article.range.start.column, 1);

    let fix = &analysis.quick_fixes_for(article)[0];
    assert!(fix.is_preferred);
    let edit = &fix.edits[0];
    assert_eq!(edit.range.start.offset, 0);
    assert_eq!(edit.range.end.offset, 4);
    assert_eq!(edit.new_text, "");
}

#[test]
fn unicode_arrow_before_clause_keyword_is_an_error() {
    let source = "  →files[x.ts]";
    let analysis = Analyzer::new().analyze_text(source);

    let typo = analysis
        .diagnostics
        .iter()
        .find(|d| d.code == codes::TYPO_ARROW_RIGHT)
        .expect("typo diagnostic");
    assert_eq!(typo.severity, Severity::Error);
    let fix = &analysis.quick_fixes_for(typo)[0];
    assert!(fix.is_preferred);
    assert_eq!(fix.edits[0].new_text, "->");
}

#[test]
fn ascii_arrow_documents_raise_no_typo_diagnostics() {
    let source = "\
§MBEL:5.0
flow::request→handler→response
@feature{Flow}->files[src/flow.ts]->tests[tests/flow.test.ts]
";
    let analysis = Analyzer::new().analyze_text(source);
    assert!(
        !analysis
            .diagnostics
            .iter()
            .any(|d| d.code.starts_with("MBEL-TYPO")),
        "{:?}",
        analysis.diagnostics
    );
}

#[test]
fn diagnostics_are_position_deduplicated() {
    // the unknown character produces one lexer error; the parser reports
    // nothing extra at the same position
    let source = "§MBEL:5.0\n;\n";
    let analysis = Analyzer::new().analyze_text(source);
    let at_semicolon: Vec<_> = analysis
        .diagnostics
        .iter()
        .filter(|d| d.range.start.line == 2 && d.range.start.column == 1)
        .collect();
    assert_eq!(at_semicolon.len(), 1, "{at_semicolon:?}");
}

#[test]
fn severities_follow_the_error_model() {
    let source = "\
[focus]
@feature{a_b}
@2024-01-15::D
";
    let analysis = Analyzer::new().analyze_text(source);

    let severity_of = |code: &str| {
        analysis
            .diagnostics
            .iter()
            .find(|d| d.code == code)
            .map(|d| d.severity)
    };
    assert_eq!(severity_of(codes::MISSING_VERSION), Some(Severity::Warning));
    assert_eq!(severity_of(codes::LOWERCASE_SECTION), Some(Severity::Warning));
    assert_eq!(severity_of(codes::LINK_ORPHAN), Some(Severity::Warning));
    assert_eq!(
        severity_of(codes::DECISION_MISSING_REASON),
        Some(Severity::Hint)
    );
}
