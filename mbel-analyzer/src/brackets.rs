//! Unclosed-bracket findings derived from the token stream.
//!
//! The lexer already emits an error for each unterminated bracket; this
//! check owns the diagnostic so it can attach the quick fix inserting the
//! missing closer at the end of the token range.

use crate::Analysis;
use mbel_core::{codes, Diagnostic, QuickFix, Severity, TextEdit};
use mbel_syntax::{ParseResult, TokenKind};

pub fn check(result: &ParseResult, analysis: &mut Analysis) {
    for token in &result.tokens {
        let (code, closer, label) = match token.kind {
            TokenKind::StructSection => (codes::UNCLOSED_SECTION, "]", "section"),
            TokenKind::StructList => (codes::UNCLOSED_LIST, "]", "list"),
            TokenKind::StructMetadata => (codes::UNCLOSED_METADATA, "}", "metadata"),
            TokenKind::StructNote => (codes::UNCLOSED_NOTE, ")", "note"),
            TokenKind::StructVariant => (codes::UNCLOSED_VARIANT, ">", "variant"),
            _ => continue,
        };
        if token.bracket_closed() {
            continue;
        }

        let fix = QuickFix::preferred(
            format!("Insert '{closer}'"),
            vec![TextEdit::insert(token.span.end, closer)],
        );
        analysis.push_with_fix(
            Diagnostic::new(
                token.span,
                Severity::Error,
                code,
                format!("Unclosed {label} bracket"),
            ),
            fix,
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::Analyzer;
    use mbel_core::codes;

    #[test]
    fn unclosed_section_gets_insert_fix() {
        let analysis = Analyzer::new().analyze_text("[unclosed\n@x::y\n");
        let diag = analysis
            .diagnostics
            .iter()
            .find(|d| d.code == codes::UNCLOSED_SECTION)
            .expect("unclosed section diagnostic");
        assert_eq!(diag.range.start.line, 1);
        assert_eq!(diag.range.start.column, 1);
        let fixes = analysis.quick_fixes_for(diag);
        assert_eq!(fixes[0].edits[0].new_text, "]");
        assert_eq!(fixes[0].edits[0].range.start.offset, "[unclosed".len());
    }

    #[test]
    fn each_bracket_kind_has_its_own_code() {
        for (source, code) in [
            ("v::{open\n", codes::UNCLOSED_METADATA),
            ("v::(open\n", codes::UNCLOSED_NOTE),
            ("v::<open\n", codes::UNCLOSED_VARIANT),
            ("@feature{X}->files[a.ts\n", codes::UNCLOSED_LIST),
        ] {
            let analysis = Analyzer::new().analyze_text(source);
            assert!(
                analysis.diagnostics.iter().any(|d| d.code == code),
                "expected {code} for {source:?}: {:?}",
                analysis.diagnostics
            );
        }
    }

    #[test]
    fn closed_brackets_are_silent() {
        let analysis = Analyzer::new().analyze_text("§MBEL:5.0\n[FOCUS]\nv::{ok}\n");
        assert!(
            !analysis.diagnostics.iter().any(|d| d.code.starts_with("UNCLOSED")),
            "{:?}",
            analysis.diagnostics
        );
    }
}
