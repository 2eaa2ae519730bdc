//! Canonical printer for MBEL documents
//!
//! Renders a [`Document`] back to notation text. The output is canonical
//! rather than byte-faithful: one statement per line, ASCII arrows for
//! clauses, list items joined with commas. Round-trip tests rely on
//! print-then-parse producing a structurally equivalent document.

use crate::parser::*;
use mbel_core::FileRef;
use std::fmt::Write;

/// Render a document to canonical MBEL text.
pub fn print_document(document: &Document) -> String {
    let mut out = String::new();
    for statement in &document.statements {
        print_statement(&mut out, statement);
        out.push('\n');
    }
    out
}

fn print_statement(out: &mut String, statement: &Statement) {
    match statement {
        Statement::Section(s) => {
            let _ = write!(out, "[{}]", s.name);
        }
        Statement::Version(v) => {
            let _ = write!(out, "§{}:{}", v.name, v.version);
        }
        Statement::Attribute(a) => {
            if let Some(temporal) = a.temporal {
                out.push_str(temporal_str(temporal));
            }
            let _ = write!(out, "{}::", a.name);
            if let Some(value) = &a.value {
                print_expression(out, value);
            }
            if let Some(metadata) = &a.metadata {
                let _ = write!(out, "{{{metadata}}}");
            }
        }
        Statement::Expression(e) => print_expression(out, &e.expression),
        Statement::Link(link) => print_link(out, link),
        Statement::Anchor(anchor) => {
            let _ = write!(out, "@{}::{}", anchor.anchor_type.as_str(), anchor.path);
            if let Some(description) = &anchor.description {
                let _ = write!(out, "\n  ->description::{description}");
            }
        }
        Statement::Decision(d) => print_decision(out, d),
        Statement::Heat(h) => print_heat(out, h),
        Statement::Intent(i) => print_intent(out, i),
    }
}

fn print_link(out: &mut String, link: &LinkDeclaration) {
    let marker = match link.link_type {
        LinkType::Feature => "@feature",
        LinkType::Task => "@task",
    };
    let _ = write!(out, "{marker}{{{}}}", link.name);
    print_file_clause(out, "files", &link.files);
    print_file_clause(out, "tests", &link.tests);
    print_file_clause(out, "docs", &link.docs);
    print_string_clause(out, "decisions", &link.decisions);
    print_string_clause(out, "related", &link.related);
    print_string_clause(out, "depends", &link.depends);
    print_file_clause(out, "blueprint", &link.blueprint);
    print_string_clause(out, "features", &link.features);
    if let Some(ep) = &link.entry_point {
        out.push_str("->entryPoint{");
        out.push_str(&ep.file);
        if let Some(symbol) = &ep.symbol {
            let _ = write!(out, ":{symbol}");
        }
        if let Some(line) = ep.line {
            let _ = write!(out, ":{line}");
        }
        out.push('}');
    }
    if let Some(why) = &link.why {
        let _ = write!(out, "->why{{{why}}}");
    }
}

fn print_decision(out: &mut String, d: &DecisionDeclaration) {
    let _ = write!(out, "@{}::{}", d.date, d.name);
    if let Some(status) = &d.status {
        let _ = write!(out, "\n  ->status::{status}");
    }
    if let Some(reason) = &d.reason {
        let _ = write!(out, "\n  ->reason{{{reason}}}");
    }
    if let Some(tradeoff) = &d.tradeoff {
        let _ = write!(out, "\n  ->tradeoff{{{tradeoff}}}");
    }
    if let Some(revisit) = &d.revisit {
        let _ = write!(out, "\n  ->revisit::{revisit}");
    }
    if let Some(superseded_by) = &d.superseded_by {
        let _ = write!(out, "\n  ->supersededBy::{superseded_by}");
    }
    if !d.alternatives.is_empty() {
        let _ = write!(out, "\n  ->alternatives[{}]", d.alternatives.join(","));
    }
    if !d.context.is_empty() {
        let _ = write!(out, "\n  ->context[{}]", d.context.join(","));
    }
}

fn print_heat(out: &mut String, h: &HeatDeclaration) {
    let _ = write!(out, "@{}::{}", h.heat_type.as_str(), h.path);
    if !h.dependents.is_empty() {
        let _ = write!(out, "\n  ->dependents[{}]", h.dependents.join(","));
    }
    for (keyword, value) in [
        ("untouched", &h.untouched),
        ("changes", &h.changes),
        ("coverage", &h.coverage),
        ("confidence", &h.confidence),
        ("impact", &h.impact),
        ("caution", &h.caution),
    ] {
        if let Some(value) = value {
            let _ = write!(out, "\n  ->{keyword}::{value}");
        }
    }
}

fn print_intent(out: &mut String, i: &IntentDeclaration) {
    let _ = write!(out, "@{}::{}", i.module, i.component);
    for (keyword, value) in [
        ("does", &i.does),
        ("doesNot", &i.does_not),
        ("contract", &i.contract),
        ("singleResponsibility", &i.single_responsibility),
        ("antiPattern", &i.anti_pattern),
    ] {
        if let Some(value) = value {
            let _ = write!(out, "\n  ->{keyword}::{value}");
        }
    }
    if !i.extends.is_empty() {
        let _ = write!(out, "\n  ->extends[{}]", i.extends.join(","));
    }
}

fn print_file_clause(out: &mut String, keyword: &str, files: &[FileRef]) {
    if files.is_empty() {
        return;
    }
    let items: Vec<String> = files.iter().map(print_file_ref).collect();
    let _ = write!(out, "->{keyword}[{}]", items.join(","));
}

fn print_string_clause(out: &mut String, keyword: &str, items: &[String]) {
    if !items.is_empty() {
        let _ = write!(out, "->{keyword}[{}]", items.join(","));
    }
}

fn print_file_ref(file: &FileRef) -> String {
    let mut item = file.path.clone();
    if let Some(range) = file.line_range {
        let _ = write!(item, ":{}-{}", range.start, range.end);
    }
    if let Some(marker) = file.marker {
        let _ = write!(item, "{{{}}}", marker.as_str());
    }
    item
}

fn temporal_str(temporal: TemporalKind) -> &'static str {
    match temporal {
        TemporalKind::Past => ">",
        TemporalKind::Present => "@",
        TemporalKind::Future => "?",
        TemporalKind::Approx => "≈",
    }
}

fn print_expression(out: &mut String, expression: &Expression) {
    match expression {
        Expression::Identifier { name, metadata, .. } => {
            out.push_str(name);
            if let Some(metadata) = metadata {
                let _ = write!(out, "{{{metadata}}}");
            }
        }
        Expression::Number { text, .. } => out.push_str(text),
        Expression::Chain { left, op, right, .. } => {
            print_expression(out, left);
            out.push_str(op.as_str());
            print_expression(out, right);
        }
        Expression::Logic { op, operands, .. } => match op {
            LogicOp::Not => {
                out.push('¬');
                if let Some(operand) = operands.first() {
                    print_expression(out, operand);
                }
            }
            LogicOp::And | LogicOp::Or => {
                let separator = if *op == LogicOp::And { " & " } else { " || " };
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        out.push_str(separator);
                    }
                    print_expression(out, operand);
                }
            }
        },
        Expression::State { state, operand, .. } => {
            print_expression(out, operand);
            out.push_str(state.as_str());
        }
        Expression::Metadata { body, .. } => {
            let _ = write!(out, "{{{body}}}");
        }
        Expression::Note { body, .. } => {
            let _ = write!(out, "({body})");
        }
        Expression::Variant { body, .. } => {
            let _ = write!(out, "<{body}>");
        }
    }
}
