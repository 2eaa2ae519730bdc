use mbel_query::{
    FileRelation, ImpactLevel, QueryEngine, RiskLevel, SimulationOp,
};
use mbel_syntax::{parse, AnchorType, DecisionStatus, Document};

const MEMORY_BANK: &str = "\
§MBEL:5.0
[ARCHITECTURE]
@feature{Core}->files[src/core.ts]->tests[tests/core.test.ts]
@feature{Lexer}->files[src/lexer.ts]->tests[tests/lexer.test.ts]->depends[Core]
@feature{Parser}->files[src/parser.ts]->tests[tests/parser.test.ts]->depends[Lexer]->entryPoint{src/parser.ts:parse:10}
@feature{Engine}->files[src/engine.ts]->tests[tests/engine.test.ts]->depends[Parser,Core]->decisions[UseAdjacencyLists]
@task{Cleanup}->files[src/cleanup.ts]
@entry::src/index.ts
  ->description::Main entry point
@hotspot::src/parser.ts
  ->description::Frequently revised grammar
@boundary::src/api/**
@critical::src/core.ts
  ->dependents[src/lexer.ts,src/parser.ts]
  ->changes::21
@stable::src/cleanup.ts
@volatile::src/engine.ts
@2024-01-15::UseAdjacencyLists
  ->status::ACTIVE
  ->reason::avoids cyclic ownership
  ->context[src/engine.ts]
@2024-02-20::DropVisitors
  ->status::SUPERSEDED
  ->supersededBy::UseAdjacencyLists
  ->reason::pattern matching is enough
@Engine::build
  ->does::indexes one document
  ->doesNot::mutate the AST
";

fn document() -> Document {
    let result = parse(MEMORY_BANK);
    assert!(result.is_clean(), "fixture errors: {:?}", result.errors());
    result.document
}

#[test]
fn feature_files_lookup() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    let parser = engine.get_feature_files("Parser").unwrap();
    assert_eq!(parser.files, vec!["src/parser.ts"]);
    assert_eq!(parser.tests, vec!["tests/parser.test.ts"]);
    let ep = parser.entry_point.unwrap();
    assert_eq!(ep.file, "src/parser.ts");
    assert_eq!(ep.symbol.as_deref(), Some("parse"));
    assert_eq!(ep.line, Some(10));

    assert!(engine.get_feature_files("Ghost").is_none());
}

#[test]
fn dependencies_direct_transitive_and_depth() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    let report = engine.get_feature_dependencies("Engine").unwrap();
    assert_eq!(report.direct, vec!["Parser", "Core"]);
    assert_eq!(report.transitive, vec!["Parser", "Lexer", "Core"]);
    assert_eq!(report.depth, 3); // Engine -> Parser -> Lexer -> Core
}

#[test]
fn dependents_are_direct_only() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    assert_eq!(engine.find_dependents("Core"), vec!["Lexer", "Engine"]);
    assert_eq!(engine.find_dependents("Parser"), vec!["Engine"]);
    assert!(engine.find_dependents("Engine").is_empty());
}

#[test]
fn file_index_tracks_relation_kind() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    let hits = engine.features_for_file("tests/lexer.test.ts");
    assert_eq!(hits, vec![("Lexer".to_string(), FileRelation::Test)]);
}

#[test]
fn acyclic_fixture_has_no_cycles() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);
    assert!(engine.detect_circular_dependencies().is_empty());
}

#[test]
fn three_node_cycle_is_detected() {
    let result = parse(
        "@feature{A}->files[a.ts]->depends[B]\n@feature{B}->files[b.ts]->depends[C]\n@feature{C}->files[c.ts]->depends[A]\n",
    );
    let engine = QueryEngine::build_from_document(&result.document);
    let cycles = engine.detect_circular_dependencies();
    assert_eq!(cycles.len(), 1);
    let cycle = &cycles[0];
    assert_eq!(cycle.first(), cycle.last());
    for name in ["A", "B", "C"] {
        assert!(cycle.iter().any(|n| n == name), "{name} missing in {cycle:?}");
    }
    // every reported edge exists in the graph
    for pair in cycle.windows(2) {
        let deps = engine.get_feature_dependencies(&pair[0]).unwrap().direct;
        assert!(deps.contains(&pair[1]));
    }
}

#[test]
fn anchor_queries() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    let by_type = engine.find_anchors_by_type(AnchorType::Hotspot);
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].path, "src/parser.ts");

    let by_concept = engine.find_anchor("ENTRY");
    assert!(by_concept.iter().any(|a| a.path == "src/index.ts"));

    let by_path = engine.find_anchor("api");
    assert_eq!(by_path.len(), 1);
    assert!(by_path[0].is_glob);
}

#[test]
fn decision_queries() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    assert_eq!(engine.find_decisions("Adjacency").len(), 1);
    assert_eq!(
        engine.find_decisions_by_status(DecisionStatus::Superseded)[0].name,
        "DropVisitors"
    );
    let by_context = engine.find_decisions_by_context("src/engine.ts");
    assert_eq!(by_context.len(), 1);
    assert_eq!(by_context[0].name, "UseAdjacencyLists");
    assert!(engine.find_decisions_by_context("src/engine").is_empty());
}

#[test]
fn intent_queries() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    let intent = engine.find_intent("Engine", "build").unwrap();
    assert_eq!(intent.does.as_deref(), Some("indexes one document"));
    assert!(engine.find_intent("Engine", "missing").is_none());
    assert_eq!(engine.find_intents_by_module("Engine").len(), 1);
}

#[test]
fn risk_levels_follow_heat_and_anchors() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    // critical heat marker, and the owning feature has dependents
    let core = engine.get_edit_risk("src/core.ts");
    assert_eq!(core.level, RiskLevel::High);
    assert!(core.reasons.iter().any(|r| r == "critical heat level"));
    assert!(core.reasons.iter().any(|r| r.contains("dependents")));
    assert!(!core.recommendations.is_empty());

    // hotspot anchor forces high even without heat
    let parser = engine.get_edit_risk("src/parser.ts");
    assert_eq!(parser.level, RiskLevel::High);
    assert!(parser.reasons.iter().any(|r| r == "hotspot area"));

    // volatile heat is medium
    let engine_file = engine.get_edit_risk("src/engine.ts");
    assert_eq!(engine_file.level, RiskLevel::Medium);

    // stable marker keeps the level low
    let cleanup = engine.get_edit_risk("src/cleanup.ts");
    assert_eq!(cleanup.level, RiskLevel::Low);
    assert!(cleanup.reasons.iter().any(|r| r == "stable"));
    assert!(cleanup.recommendations.is_empty());

    // unindexed file
    let unknown = engine.get_edit_risk("src/unknown.ts");
    assert_eq!(unknown.level, RiskLevel::Unknown);
    assert!(!unknown.recommendations.is_empty());
}

#[test]
fn risk_is_monotone_in_heat() {
    let without = parse("@feature{F}->files[src/x.ts]->tests[t.ts]\n@feature{G}->files[g.ts]->depends[F]\n");
    let with_heat = parse("@feature{F}->files[src/x.ts]->tests[t.ts]\n@feature{G}->files[g.ts]->depends[F]\n@critical::src/x.ts\n");

    let engine_a = QueryEngine::build_from_document(&without.document);
    let engine_b = QueryEngine::build_from_document(&with_heat.document);
    let before = engine_a.get_edit_risk("src/x.ts").level;
    let after = engine_b.get_edit_risk("src/x.ts").level;
    assert!(after >= before);
    assert_eq!(after, RiskLevel::High);
    assert!(engine_b
        .get_edit_risk("src/x.ts")
        .reasons
        .iter()
        .any(|r| r == "critical heat level"));
}

#[test]
fn impact_analysis_closure() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    let impact = engine.get_impact_analysis(&["src/core.ts".to_string()]);
    assert_eq!(impact.affected_features, vec!["Core"]);
    assert_eq!(impact.dependent_features, vec!["Lexer", "Engine"]);
    // Parser reaches Core only transitively
    assert!(impact.transitive_impact.contains(&"Parser".to_string()));
    assert!(impact
        .affected_tests
        .contains(&"tests/core.test.ts".to_string()));
    assert!(impact
        .affected_tests
        .contains(&"tests/lexer.test.ts".to_string()));
    // heat dependents for src/core.ts
    assert_eq!(
        impact.affected_files,
        vec!["src/lexer.ts", "src/parser.ts"]
    );
}

#[test]
fn impact_of_unindexed_file_is_empty() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);
    let impact = engine.get_impact_analysis(&["nowhere.ts".to_string()]);
    assert!(impact.affected_features.is_empty());
    assert!(impact.transitive_impact.is_empty());
    assert!(impact.affected_tests.is_empty());
}

#[test]
fn work_context_aggregates_everything() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    let context = engine.get_work_context("Engine").unwrap();
    assert_eq!(context.feature.name, "Engine");
    assert_eq!(context.dependencies.direct, vec!["Parser", "Core"]);
    assert!(context.dependents.is_empty());
    // linked by ->decisions and by context path
    assert_eq!(context.decisions.len(), 1);
    assert_eq!(context.decisions[0].name, "UseAdjacencyLists");
    assert!(context.heat.iter().any(|h| h.path == "src/engine.ts"));
    assert_eq!(context.risk, RiskLevel::Medium);
}

#[test]
fn semantic_search_spans_all_indices() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    let results = engine.semantic_search("parser");
    assert!(results.features.contains(&"Parser".to_string()));
    assert!(results.anchors.iter().any(|a| a.path == "src/parser.ts"));

    let results = engine.semantic_search("ownership");
    assert_eq!(results.decisions.len(), 1);

    let results = engine.semantic_search("mutate");
    assert_eq!(results.intents.len(), 1);
}

#[test]
fn simulate_add_dep_detects_cycle_without_mutating() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    // Core -> Engine would close the loop Engine -> Core
    let result = engine.simulate(SimulationOp::AddDep {
        from: "Core".to_string(),
        to: "Engine".to_string(),
    });
    assert!(result.circular);

    // the stored graph is untouched
    assert!(engine.get_feature_dependencies("Core").unwrap().direct.is_empty());

    let safe = engine.simulate(SimulationOp::AddDep {
        from: "Cleanup".to_string(),
        to: "Core".to_string(),
    });
    assert!(!safe.circular);
    assert!(safe.new_dependencies.contains(&"Core".to_string()));
}

#[test]
fn simulate_remove_feature_reports_breakage() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    let result = engine.simulate(SimulationOp::RemoveFeature {
        name: "Core".to_string(),
    });
    assert_eq!(result.breaking_dependents, vec!["Lexer", "Engine"]);
    assert!(result.affected_features.contains(&"Parser".to_string()));
    // Core + Lexer + Engine + Parser affected out of 5 -> high
    assert_eq!(result.impact_level, ImpactLevel::High);
    assert!(result
        .suggested_tests
        .contains(&"tests/parser.test.ts".to_string()));
}

#[test]
fn simulate_add_feature_positions_the_node() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);

    let result = engine.simulate(SimulationOp::AddFeature {
        name: "Formatter".to_string(),
        depends_on: vec!["Parser".to_string()],
    });
    assert!(!result.circular);
    assert_eq!(result.graph_position.dependencies, 1);
    assert_eq!(result.graph_position.dependents, 0);
    assert_eq!(result.graph_position.role, "root");
    assert!(result.new_dependencies.contains(&"Lexer".to_string()));
}

#[test]
fn queries_are_deterministic() {
    let document = document();
    let engine = QueryEngine::build_from_document(&document);
    let a = engine.get_impact_analysis(&["src/core.ts".to_string()]);
    let b = engine.get_impact_analysis(&["src/core.ts".to_string()]);
    assert_eq!(a, b);
    assert_eq!(
        engine.detect_circular_dependencies(),
        engine.detect_circular_dependencies()
    );
}
