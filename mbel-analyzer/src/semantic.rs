//! Semantic validation over the AST: version header, section usage,
//! attribute duplication, and the per-declaration rules for links, anchors,
//! decisions, heat markers, and intents.

use crate::Analysis;
use chrono::NaiveDate;
use mbel_core::{codes, Diagnostic, FileRef, Position, QuickFix, Severity, Span, TextEdit};
use mbel_syntax::{
    AnchorDeclaration, DecisionDeclaration, DecisionStatus, Document, HeatDeclaration,
    IntentDeclaration, LinkDeclaration, ParseResult, Statement,
};
use std::collections::HashMap;

pub fn check(result: &ParseResult, analysis: &mut Analysis) {
    let document = &result.document;
    check_version(document, analysis);
    check_sections(document, analysis);
    check_attributes(document, analysis);
    check_links(document, analysis);
    check_anchors(document, analysis);
    check_decisions(document, analysis);
    check_heat(document, analysis);
    check_intents(document, analysis);
}

/// Every non-empty document should open with a `§MBEL:N.N` header.
fn check_version(document: &Document, analysis: &mut Analysis) {
    if document.statements.is_empty() {
        return;
    }
    let has_version = document
        .statements
        .iter()
        .any(|s| matches!(s, Statement::Version(_)));
    if has_version {
        return;
    }
    let fix = QuickFix::preferred(
        "Insert '§MBEL:5.0' header",
        vec![TextEdit::insert(Position::start(), "§MBEL:5.0\n")],
    );
    analysis.push_with_fix(
        Diagnostic::new(
            Span::empty(Position::start()),
            Severity::Warning,
            codes::MISSING_VERSION,
            "Document has no §MBEL version header",
        ),
        fix,
    );
}

fn check_sections(document: &Document, analysis: &mut Analysis) {
    let mut seen: HashMap<&str, Span> = HashMap::new();
    let statements = &document.statements;

    for (i, statement) in statements.iter().enumerate() {
        let Statement::Section(section) = statement else {
            continue;
        };

        // empty section: nothing before the next section or end of document
        let empty = statements
            .get(i + 1)
            .map_or(true, |next| matches!(next, Statement::Section(_)));
        if empty {
            analysis.push(Diagnostic::new(
                section.span,
                Severity::Warning,
                codes::UNUSED_SECTION,
                format!("Section [{}] has no content", section.name),
            ));
        }

        if section.name.chars().any(|c| c.is_ascii_lowercase()) {
            let fix = QuickFix::preferred(
                format!("Rename to [{}]", section.name.to_uppercase()),
                vec![TextEdit::replace(
                    section.span,
                    format!("[{}]", section.name.to_uppercase()),
                )],
            );
            analysis.push_with_fix(
                Diagnostic::new(
                    section.span,
                    Severity::Warning,
                    codes::LOWERCASE_SECTION,
                    format!("Section name [{}] should be uppercase", section.name),
                ),
                fix,
            );
        }

        if let Some(first) = seen.get(section.name.as_str()) {
            analysis.push(
                Diagnostic::new(
                    section.span,
                    Severity::Warning,
                    codes::DUPLICATE_SECTION,
                    format!("Duplicate section [{}]", section.name),
                )
                .with_related(*first, "first declared here"),
            );
        } else {
            seen.insert(&section.name, section.span);
        }
    }
}

fn check_attributes(document: &Document, analysis: &mut Analysis) {
    let mut seen: HashMap<&str, Span> = HashMap::new();
    for statement in &document.statements {
        let Statement::Attribute(attribute) = statement else {
            continue;
        };
        if let Some(first) = seen.get(attribute.name.as_str()) {
            analysis.push(
                Diagnostic::new(
                    attribute.span,
                    Severity::Warning,
                    codes::DUPLICATE_ATTRIBUTE,
                    format!("Duplicate attribute '{}'", attribute.name),
                )
                .with_related(*first, "first declared here"),
            );
        } else {
            seen.insert(&attribute.name, attribute.span);
        }
    }
}

// ============================================================================
// LINKS
// ============================================================================

fn check_links(document: &Document, analysis: &mut Analysis) {
    let links: Vec<&LinkDeclaration> = document.links().collect();
    let mut by_name: HashMap<&str, Span> = HashMap::new();

    for link in &links {
        if link.name.is_empty() {
            analysis.push(Diagnostic::new(
                link.span,
                Severity::Warning,
                codes::LINK_MISSING_NAME,
                "Link declaration has no name",
            ));
            continue;
        }
        if !is_valid_link_name(&link.name) {
            analysis.push(Diagnostic::new(
                link.span,
                Severity::Warning,
                codes::LINK_INVALID_NAME,
                format!("Link name '{}' contains invalid characters", link.name),
            ));
        }
        if let Some(first) = by_name.get(link.name.as_str()) {
            analysis.push(
                Diagnostic::new(
                    link.span,
                    Severity::Warning,
                    codes::LINK_DUPLICATE_NAME,
                    format!("Duplicate link name '{}'", link.name),
                )
                .with_related(*first, "first declared here"),
            );
        } else {
            by_name.insert(&link.name, link.span);
        }
    }

    for link in &links {
        check_link_files(link, analysis);

        for reference in link.related.iter().chain(&link.depends) {
            if reference.is_empty() {
                continue;
            }
            if !by_name.contains_key(reference.as_str()) {
                analysis.push(Diagnostic::new(
                    link.span,
                    Severity::Warning,
                    codes::LINK_UNDEFINED_REFERENCE,
                    format!("'{}' references undefined link '{reference}'", link.name),
                ));
            }
        }
        if link.related.iter().any(|r| r == &link.name) && !link.name.is_empty() {
            analysis.push(Diagnostic::new(
                link.span,
                Severity::Warning,
                codes::LINK_SELF_REFERENCE,
                format!("'{}' lists itself as related", link.name),
            ));
        }

        if link.files.is_empty() && link.tests.is_empty() {
            analysis.push(Diagnostic::new(
                link.span,
                Severity::Warning,
                codes::LINK_ORPHAN,
                format!(
                    "'{}' has no files and no tests",
                    if link.name.is_empty() { "<unnamed>" } else { &link.name }
                ),
            ));
        }
    }

    check_link_cycles(&links, analysis);
}

fn check_link_files(link: &LinkDeclaration, analysis: &mut Analysis) {
    let all = link
        .files
        .iter()
        .chain(&link.tests)
        .chain(&link.docs)
        .chain(&link.blueprint);
    for file in all {
        check_file_ref(file, link.span, analysis);
    }
}

fn check_file_ref(file: &FileRef, span: Span, analysis: &mut Analysis) {
    if file.path.contains("***") {
        analysis.push(Diagnostic::new(
            span,
            Severity::Warning,
            codes::LINK_INVALID_GLOB,
            format!("Triple asterisk in glob '{}'", file.path),
        ));
    }
    if let Some(range) = file.line_range {
        if range.start == 0 || range.end == 0 {
            analysis.push(Diagnostic::new(
                span,
                Severity::Warning,
                codes::LINK_INVALID_LINE_RANGE,
                format!("Line range on '{}' is 1-based", file.path),
            ));
        } else if range.start > range.end {
            analysis.push(Diagnostic::new(
                span,
                Severity::Warning,
                codes::LINK_LINE_RANGE_ORDER,
                format!(
                    "Line range {}-{} on '{}' is reversed",
                    range.start, range.end, file.path
                ),
            ));
        }
    }
}

/// Depth-first cycle search over `depends`. Each cycle reports once, at the
/// declaration of its entry node.
fn check_link_cycles(links: &[&LinkDeclaration], analysis: &mut Analysis) {
    let by_name: HashMap<&str, &LinkDeclaration> =
        links.iter().map(|l| (l.name.as_str(), *l)).collect();
    let mut reported: Vec<Vec<&str>> = Vec::new();

    for link in links {
        if link.name.is_empty() {
            continue;
        }
        let mut path: Vec<&str> = vec![&link.name];
        if let Some(cycle) = dfs_cycle(&by_name, &link.name, &mut path) {
            if !reported.iter().any(|seen| same_cycle(seen, &cycle)) {
                analysis.push(Diagnostic::new(
                    link.span,
                    Severity::Warning,
                    codes::LINK_CIRCULAR_DEPENDENCY,
                    format!("Circular dependency: {}", cycle.join(" -> ")),
                ));
                reported.push(cycle);
            }
        }
    }
}

fn dfs_cycle<'a>(
    by_name: &HashMap<&'a str, &'a LinkDeclaration>,
    origin: &'a str,
    path: &mut Vec<&'a str>,
) -> Option<Vec<&'a str>> {
    let current = *path.last()?;
    let link = by_name.get(current)?;
    for dep in &link.depends {
        if dep == origin {
            let mut cycle = path.clone();
            cycle.push(origin);
            return Some(cycle);
        }
        if path.contains(&dep.as_str()) {
            continue;
        }
        if let Some(dep_link) = by_name.get(dep.as_str()) {
            path.push(&dep_link.name);
            if let Some(cycle) = dfs_cycle(by_name, origin, path) {
                return Some(cycle);
            }
            path.pop();
        }
    }
    None
}

/// Two cycles are the same up to rotation of the repeated endpoint.
fn same_cycle(a: &[&str], b: &[&str]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let inner_a = &a[..a.len() - 1];
    let inner_b = &b[..b.len() - 1];
    (0..inner_a.len()).any(|shift| {
        inner_a
            .iter()
            .cycle()
            .skip(shift)
            .take(inner_a.len())
            .eq(inner_b.iter())
    })
}

fn is_valid_link_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

// ============================================================================
// ANCHORS
// ============================================================================

fn check_anchors(document: &Document, analysis: &mut Analysis) {
    let mut seen: HashMap<&str, Span> = HashMap::new();
    for anchor in document.anchors() {
        check_anchor(anchor, &mut seen, analysis);
    }
}

fn check_anchor<'a>(
    anchor: &'a AnchorDeclaration,
    seen: &mut HashMap<&'a str, Span>,
    analysis: &mut Analysis,
) {
    if anchor.path.is_empty() {
        analysis.push(Diagnostic::new(
            anchor.span,
            Severity::Warning,
            codes::ANCHOR_EMPTY_PATH,
            "Anchor has no path",
        ));
        return;
    }
    if anchor.path.contains(' ') {
        analysis.push(Diagnostic::new(
            anchor.span,
            Severity::Warning,
            codes::ANCHOR_PATH_SPACES,
            format!("Anchor path '{}' contains spaces", anchor.path),
        ));
    }
    if anchor.path.contains("***") {
        analysis.push(Diagnostic::new(
            anchor.span,
            Severity::Warning,
            codes::ANCHOR_INVALID_GLOB,
            format!("Triple asterisk in anchor glob '{}'", anchor.path),
        ));
    }
    if let Some(description) = &anchor.description {
        if description.trim().is_empty() {
            analysis.push(Diagnostic::new(
                anchor.span,
                Severity::Warning,
                codes::ANCHOR_EMPTY_DESCRIPTION,
                format!("Anchor '{}' has an empty description", anchor.path),
            ));
        }
    }
    if let Some(first) = seen.get(anchor.path.as_str()) {
        analysis.push(
            Diagnostic::new(
                anchor.span,
                Severity::Warning,
                codes::ANCHOR_DUPLICATE,
                format!("Duplicate anchor for '{}'", anchor.path),
            )
            .with_related(*first, "first declared here"),
        );
    } else {
        seen.insert(&anchor.path, anchor.span);
    }
}

// ============================================================================
// DECISIONS
// ============================================================================

fn check_decisions(document: &Document, analysis: &mut Analysis) {
    let decisions: Vec<&DecisionDeclaration> = document.decisions().collect();
    let mut by_name: HashMap<&str, Span> = HashMap::new();

    for decision in &decisions {
        if decision.name.is_empty() {
            analysis.push(Diagnostic::new(
                decision.span,
                Severity::Warning,
                codes::DECISION_EMPTY_NAME,
                "Decision has no name",
            ));
        } else if let Some(first) = by_name.get(decision.name.as_str()) {
            analysis.push(
                Diagnostic::new(
                    decision.span,
                    Severity::Warning,
                    codes::DECISION_DUPLICATE,
                    format!("Duplicate decision '{}'", decision.name),
                )
                .with_related(*first, "first declared here"),
            );
        } else {
            by_name.insert(&decision.name, decision.span);
        }

        if NaiveDate::parse_from_str(&decision.date, "%Y-%m-%d").is_err() {
            analysis.push(Diagnostic::new(
                decision.span,
                Severity::Warning,
                codes::DECISION_INVALID_DATE,
                format!("'{}' is not a valid date", decision.date),
            ));
        }

        match (&decision.status, decision.parsed_status()) {
            (Some(raw), None) => analysis.push(Diagnostic::new(
                decision.span,
                Severity::Warning,
                codes::DECISION_INVALID_STATUS,
                format!("Unknown status '{raw}'; expected ACTIVE, SUPERSEDED, or RECONSIDERING"),
            )),
            (_, Some(DecisionStatus::Superseded)) if decision.superseded_by.is_none() => {
                analysis.push(Diagnostic::new(
                    decision.span,
                    Severity::Warning,
                    codes::DECISION_SUPERSEDED_WITHOUT_TARGET,
                    format!("'{}' is SUPERSEDED but names no successor", decision.name),
                ));
            }
            _ => {}
        }

        match &decision.reason {
            None => analysis.push(Diagnostic::new(
                decision.span,
                Severity::Hint,
                codes::DECISION_MISSING_REASON,
                format!("Decision '{}' records no reason", decision.name),
            )),
            Some(reason) if reason.trim().is_empty() => analysis.push(Diagnostic::new(
                decision.span,
                Severity::Warning,
                codes::DECISION_EMPTY_REASON,
                format!("Decision '{}' has an empty reason", decision.name),
            )),
            _ => {}
        }
        if decision
            .tradeoff
            .as_deref()
            .is_some_and(|t| t.trim().is_empty())
        {
            analysis.push(Diagnostic::new(
                decision.span,
                Severity::Warning,
                codes::DECISION_EMPTY_TRADEOFF,
                format!("Decision '{}' has an empty tradeoff", decision.name),
            ));
        }

        for path in &decision.context {
            if path.contains(' ') {
                analysis.push(Diagnostic::new(
                    decision.span,
                    Severity::Warning,
                    codes::DECISION_CONTEXT_PATH_SPACES,
                    format!("Context path '{path}' contains spaces"),
                ));
            }
        }
    }

    // dangling supersededBy needs the complete name set
    for decision in &decisions {
        if let Some(target) = &decision.superseded_by {
            if !target.is_empty() && !by_name.contains_key(target.as_str()) {
                analysis.push(Diagnostic::new(
                    decision.span,
                    Severity::Warning,
                    codes::DECISION_DANGLING_SUPERSEDED_BY,
                    format!("supersededBy names unknown decision '{target}'"),
                ));
            }
        }
    }
}

// ============================================================================
// HEAT
// ============================================================================

fn check_heat(document: &Document, analysis: &mut Analysis) {
    let mut seen: HashMap<&str, Span> = HashMap::new();
    for heat in document.heat_markers() {
        check_heat_marker(heat, &mut seen, analysis);
    }
}

fn check_heat_marker<'a>(
    heat: &'a HeatDeclaration,
    seen: &mut HashMap<&'a str, Span>,
    analysis: &mut Analysis,
) {
    if heat.path.is_empty() {
        analysis.push(Diagnostic::new(
            heat.span,
            Severity::Warning,
            codes::HEAT_EMPTY_PATH,
            "Heat marker has no path",
        ));
        return;
    }
    if heat.path.contains(' ') {
        analysis.push(Diagnostic::new(
            heat.span,
            Severity::Warning,
            codes::HEAT_INVALID_PATH,
            format!("Heat path '{}' contains spaces", heat.path),
        ));
    }
    if heat.path.contains("***") {
        analysis.push(Diagnostic::new(
            heat.span,
            Severity::Warning,
            codes::HEAT_INVALID_GLOB,
            format!("Triple asterisk in heat glob '{}'", heat.path),
        ));
    }
    if let Some(first) = seen.get(heat.path.as_str()) {
        analysis.push(
            Diagnostic::new(
                heat.span,
                Severity::Warning,
                codes::HEAT_DUPLICATE,
                format!("Duplicate heat marker for '{}'", heat.path),
            )
            .with_related(*first, "first declared here"),
        );
    } else {
        seen.insert(&heat.path, heat.span);
    }

    if let Some(changes) = &heat.changes {
        if heat.changes_count().is_none() {
            analysis.push(Diagnostic::new(
                heat.span,
                Severity::Warning,
                codes::HEAT_NON_NUMERIC_CHANGES,
                format!("changes value '{changes}' is not an integer"),
            ));
        }
    }

    for (keyword, value) in [
        ("untouched", &heat.untouched),
        ("coverage", &heat.coverage),
        ("confidence", &heat.confidence),
        ("impact", &heat.impact),
        ("caution", &heat.caution),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            analysis.push(Diagnostic::new(
                heat.span,
                Severity::Warning,
                codes::HEAT_EMPTY_FIELD,
                format!("Heat field '{keyword}' is empty on '{}'", heat.path),
            ));
        }
    }

    for dependent in &heat.dependents {
        if dependent.trim().is_empty() {
            analysis.push(Diagnostic::new(
                heat.span,
                Severity::Warning,
                codes::HEAT_EMPTY_DEPENDENT,
                format!("Empty entry in dependents of '{}'", heat.path),
            ));
        }
    }
}

// ============================================================================
// INTENTS
// ============================================================================

fn check_intents(document: &Document, analysis: &mut Analysis) {
    let mut seen: HashMap<(String, String), Span> = HashMap::new();
    for intent in document.intents() {
        check_intent(intent, &mut seen, analysis);
    }
}

fn check_intent(
    intent: &IntentDeclaration,
    seen: &mut HashMap<(String, String), Span>,
    analysis: &mut Analysis,
) {
    if intent.module.is_empty() {
        analysis.push(Diagnostic::new(
            intent.span,
            Severity::Warning,
            codes::INTENT_EMPTY_MODULE,
            "Intent has no module",
        ));
    }
    if intent.component.is_empty() {
        analysis.push(Diagnostic::new(
            intent.span,
            Severity::Warning,
            codes::INTENT_EMPTY_COMPONENT,
            format!("Intent '{}' has no component", intent.module),
        ));
    }

    let key = (intent.module.clone(), intent.component.clone());
    if let Some(first) = seen.get(&key) {
        analysis.push(
            Diagnostic::new(
                intent.span,
                Severity::Warning,
                codes::INTENT_DUPLICATE,
                format!("Duplicate intent '{}::{}'", intent.module, intent.component),
            )
            .with_related(*first, "first declared here"),
        );
    } else {
        seen.insert(key, intent.span);
    }

    for (keyword, value) in [
        ("does", &intent.does),
        ("doesNot", &intent.does_not),
        ("contract", &intent.contract),
        ("singleResponsibility", &intent.single_responsibility),
        ("antiPattern", &intent.anti_pattern),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            analysis.push(Diagnostic::new(
                intent.span,
                Severity::Warning,
                codes::INTENT_EMPTY_CLAUSE,
                format!(
                    "Clause '{keyword}' is empty on '{}::{}'",
                    intent.module, intent.component
                ),
            ));
        }
    }
    for item in &intent.extends {
        if item.trim().is_empty() {
            analysis.push(Diagnostic::new(
                intent.span,
                Severity::Warning,
                codes::INTENT_EMPTY_EXTENDS_ITEM,
                format!(
                    "Empty entry in extends of '{}::{}'",
                    intent.module, intent.component
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Analyzer;
    use mbel_core::{codes, Severity};

    fn diagnostics(source: &str) -> Vec<(String, Severity)> {
        Analyzer::new()
            .analyze_text(source)
            .diagnostics
            .into_iter()
            .map(|d| (d.code, d.severity))
            .collect()
    }

    fn has(source: &str, code: &str) -> bool {
        diagnostics(source).iter().any(|(c, _)| c == code)
    }

    #[test]
    fn missing_version_has_insert_fix_at_origin() {
        let analysis = Analyzer::new().analyze_text("[FOCUS]\nv::1\n");
        let diag = analysis
            .diagnostics
            .iter()
            .find(|d| d.code == codes::MISSING_VERSION)
            .expect("missing version diagnostic");
        assert_eq!(diag.range.start.line, 1);
        assert_eq!(diag.range.start.column, 1);
        let fixes = analysis.quick_fixes_for(diag);
        assert_eq!(fixes[0].edits[0].new_text, "§MBEL:5.0\n");
        assert_eq!(fixes[0].edits[0].range.start.offset, 0);
    }

    #[test]
    fn empty_document_is_not_missing_a_version() {
        assert!(diagnostics("").is_empty());
    }

    #[test]
    fn empty_and_duplicate_sections() {
        let source = "§MBEL:5.0\n[EMPTY]\n[WORK]\nv::1\n[WORK]\nw::2\n";
        assert!(has(source, codes::UNUSED_SECTION));
        assert!(has(source, codes::DUPLICATE_SECTION));
        let analysis = Analyzer::new().analyze_text(source);
        let dup = analysis
            .diagnostics
            .iter()
            .find(|d| d.code == codes::DUPLICATE_SECTION)
            .unwrap();
        assert_eq!(dup.related_info.len(), 1);
    }

    #[test]
    fn lowercase_section_flagged_with_fix() {
        assert!(has("§MBEL:5.0\n[focus]\nv::1\n", codes::LOWERCASE_SECTION));
    }

    #[test]
    fn duplicate_attribute_flagged() {
        assert!(has("§MBEL:5.0\nphase::a\nphase::b\n", codes::DUPLICATE_ATTRIBUTE));
    }

    #[test]
    fn link_validation_rules() {
        let base = "§MBEL:5.0\n";
        assert!(has(
            &format!("{base}@feature{{A}}->files[a.ts]->related[Missing]\n"),
            codes::LINK_UNDEFINED_REFERENCE
        ));
        assert!(has(
            &format!("{base}@feature{{A}}->files[a.ts]->related[A]\n"),
            codes::LINK_SELF_REFERENCE
        ));
        assert!(has(
            &format!("{base}@feature{{A}}->files[src/***.ts]\n"),
            codes::LINK_INVALID_GLOB
        ));
        assert!(has(
            &format!("{base}@feature{{A}}->files[a.ts:9-3]\n"),
            codes::LINK_LINE_RANGE_ORDER
        ));
        assert!(has(&format!("{base}@feature{{A}}\n"), codes::LINK_ORPHAN));
        assert!(has(
            &format!("{base}@feature{{A}}->files[a.ts]\n@feature{{A}}->files[b.ts]\n"),
            codes::LINK_DUPLICATE_NAME
        ));
        assert!(has(&format!("{base}@feature->files[a.ts]\n"), codes::LINK_MISSING_NAME));
    }

    #[test]
    fn dependency_cycle_reported_once() {
        let source = "§MBEL:5.0\n@feature{A}->files[a.ts]->depends[B]\n@feature{B}->files[b.ts]->depends[C]\n@feature{C}->files[c.ts]->depends[A]\n";
        let analysis = Analyzer::new().analyze_text(source);
        let cycles: Vec<_> = analysis
            .diagnostics
            .iter()
            .filter(|d| d.code == codes::LINK_CIRCULAR_DEPENDENCY)
            .collect();
        assert_eq!(cycles.len(), 1, "{:?}", analysis.diagnostics);
        assert!(cycles[0].message.contains('A'));
        assert!(cycles[0].message.contains('B'));
        assert!(cycles[0].message.contains('C'));
    }

    #[test]
    fn anchor_validation_rules() {
        let base = "§MBEL:5.0\n";
        assert!(has(
            &format!("{base}@entry::src/***.ts\n"),
            codes::ANCHOR_INVALID_GLOB
        ));
        assert!(has(
            &format!("{base}@entry::src/a.ts\n@hotspot::src/a.ts\n"),
            codes::ANCHOR_DUPLICATE
        ));
        assert!(has(
            &format!("{base}@entry::src/a.ts\n->description::\n"),
            codes::ANCHOR_EMPTY_DESCRIPTION
        ));
        assert!(has(&format!("{base}@entry::\n"), codes::ANCHOR_EMPTY_PATH));
    }

    #[test]
    fn decision_validation_rules() {
        let base = "§MBEL:5.0\n";
        assert!(has(
            &format!("{base}@2024-13-40::Bad->reason::x\n"),
            codes::DECISION_INVALID_DATE
        ));
        assert!(has(
            &format!("{base}@2024-01-15::D->status::MAYBE->reason::x\n"),
            codes::DECISION_INVALID_STATUS
        ));
        assert!(has(
            &format!("{base}@2024-01-15::D\n->status::SUPERSEDED\n->reason::x\n"),
            codes::DECISION_SUPERSEDED_WITHOUT_TARGET
        ));
        assert!(has(
            &format!("{base}@2024-01-15::D\n->supersededBy::Ghost\n->reason::x\n"),
            codes::DECISION_DANGLING_SUPERSEDED_BY
        ));
        let missing_reason = diagnostics(&format!("{base}@2024-01-15::D\n"));
        assert!(missing_reason
            .iter()
            .any(|(c, s)| c == codes::DECISION_MISSING_REASON && *s == Severity::Hint));
        assert!(has(
            &format!("{base}@2024-01-15::D\n->reason::x\n->context[docs/a b.md]\n"),
            codes::DECISION_CONTEXT_PATH_SPACES
        ));
    }

    #[test]
    fn heat_validation_rules() {
        let base = "§MBEL:5.0\n";
        assert!(has(
            &format!("{base}@critical::src/a.ts\n@stable::src/a.ts\n"),
            codes::HEAT_DUPLICATE
        ));
        assert!(has(
            &format!("{base}@hot::src/a.ts\n->changes::often\n"),
            codes::HEAT_NON_NUMERIC_CHANGES
        ));
        assert!(has(
            &format!("{base}@hot::src/a.ts\n->coverage::\n"),
            codes::HEAT_EMPTY_FIELD
        ));
        assert!(has(&format!("{base}@volatile::src/***.ts\n"), codes::HEAT_INVALID_GLOB));
    }

    #[test]
    fn intent_validation_rules() {
        let base = "§MBEL:5.0\n";
        assert!(has(
            &format!("{base}@Parser::tokenize\n->does::\n"),
            codes::INTENT_EMPTY_CLAUSE
        ));
        assert!(has(
            &format!("{base}@Parser::tokenize\n@Parser::tokenize\n"),
            codes::INTENT_DUPLICATE
        ));
        assert!(has(
            &format!("{base}@Parser::tokenize\n->extends[,Scanner]\n"),
            codes::INTENT_EMPTY_EXTENDS_ITEM
        ));
    }

    #[test]
    fn valid_decision_only_notes_missing_tradeoff_nothing_else() {
        let source = "§MBEL:5.0\n@2024-01-15::UseAdjacencyLists\n->status::ACTIVE\n->reason::avoids cyclic ownership\n";
        let found = diagnostics(source);
        assert!(
            found.iter().all(|(c, _)| !c.starts_with("MBEL-DECISION")),
            "{found:?}"
        );
    }
}
