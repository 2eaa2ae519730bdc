//! Error-recovery behavior of the parser across malformed inputs.

use mbel_syntax::{parse, Statement};

#[test]
fn one_bad_line_does_not_poison_the_rest() {
    let sources = [
        "&&&\n@feature{A}->files[a.ts]\n",
        "§\n@feature{A}->files[a.ts]\n",
        "> \n@feature{A}->files[a.ts]\n",
        "5x 7y\n@feature{A}->files[a.ts]\n",
    ];
    for source in sources {
        let result = parse(source);
        assert!(
            result.document.links().any(|l| l.name == "A"),
            "no recovery for {source:?}: {:?}",
            result.document.statements
        );
    }
}

#[test]
fn error_positions_point_at_the_offender() {
    let result = parse("x::\n¬\n");
    // `¬` with no operand fails inside line 2
    assert!(result
        .parse_errors
        .iter()
        .any(|e| e.span.start.line == 2), "{:?}", result.parse_errors);
}

#[test]
fn statements_before_and_after_bad_line_survive() {
    let result = parse("@feature{Before}->files[b.ts]\n|||bad|||\n@feature{After}->files[a.ts]\n");
    let names: Vec<_> = result.document.links().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Before", "After"]);
    assert!(!result.parse_errors.is_empty());
}

#[test]
fn arrow_clause_without_declaration_is_an_error() {
    let result = parse("->files[a.ts]\n@x::y\n");
    assert!(!result.parse_errors.is_empty());
    assert!(result
        .document
        .statements
        .iter()
        .any(|s| matches!(s, Statement::Attribute(_))));
}

#[test]
fn deeply_malformed_input_terminates() {
    let noise = "[{<(|&¬".repeat(200);
    let result = parse(&noise);
    // termination plus contained positions is all that is promised
    for statement in &result.document.statements {
        assert!(statement.span().end.offset <= noise.len());
    }
}

#[test]
fn empty_and_whitespace_sources() {
    assert!(parse("").document.statements.is_empty());
    assert!(parse("\n\n\n").document.statements.is_empty());
    assert!(parse("   \t  \n").document.statements.is_empty());
}
