//! The query engine: indices over one document plus the public queries.
//!
//! The engine borrows the document; indices hold references into it and
//! cloned name keys only. Rebuilding from a fresh document is the way to
//! refresh. Every query is pure and deterministic: index walks follow
//! document order, never hash-map iteration order.

use crate::glob::glob_matches;
use crate::graph::DependencyGraph;
use crate::types::*;
use mbel_syntax::{
    AnchorDeclaration, AnchorType, DecisionDeclaration, DecisionStatus, Document,
    HeatDeclaration, HeatType, IntentDeclaration, LinkDeclaration, Statement,
};
use std::collections::HashMap;

pub struct QueryEngine<'a> {
    features: Vec<&'a LinkDeclaration>,
    feature_index: HashMap<&'a str, &'a LinkDeclaration>,
    /// path -> (feature name, relation), in document order.
    file_index: HashMap<&'a str, Vec<(&'a str, FileRelation)>>,
    graph: DependencyGraph,
    anchors: Vec<&'a AnchorDeclaration>,
    anchor_index: HashMap<&'a str, &'a AnchorDeclaration>,
    decisions: Vec<&'a DecisionDeclaration>,
    decision_index: HashMap<&'a str, &'a DecisionDeclaration>,
    heat: Vec<&'a HeatDeclaration>,
    heat_index: HashMap<&'a str, &'a HeatDeclaration>,
    intents: Vec<&'a IntentDeclaration>,
    intent_index: HashMap<(&'a str, &'a str), &'a IntentDeclaration>,
}

impl<'a> QueryEngine<'a> {
    /// Index a parsed document. Duplicate names keep their first
    /// declaration in lookups; ordered walks still see every declaration.
    pub fn build_from_document(document: &'a Document) -> Self {
        let mut engine = QueryEngine {
            features: Vec::new(),
            feature_index: HashMap::new(),
            file_index: HashMap::new(),
            graph: DependencyGraph::new(),
            anchors: Vec::new(),
            anchor_index: HashMap::new(),
            decisions: Vec::new(),
            decision_index: HashMap::new(),
            heat: Vec::new(),
            heat_index: HashMap::new(),
            intents: Vec::new(),
            intent_index: HashMap::new(),
        };

        for statement in &document.statements {
            match statement {
                Statement::Link(link) => engine.index_link(link),
                Statement::Anchor(anchor) => {
                    engine.anchors.push(anchor);
                    engine.anchor_index.entry(&anchor.path).or_insert(anchor);
                }
                Statement::Decision(decision) => {
                    engine.decisions.push(decision);
                    engine
                        .decision_index
                        .entry(&decision.name)
                        .or_insert(decision);
                }
                Statement::Heat(heat) => {
                    engine.heat.push(heat);
                    engine.heat_index.entry(&heat.path).or_insert(heat);
                }
                Statement::Intent(intent) => {
                    engine.intents.push(intent);
                    engine
                        .intent_index
                        .entry((intent.module.as_str(), intent.component.as_str()))
                        .or_insert(intent);
                }
                _ => {}
            }
        }

        tracing::debug!(
            features = engine.features.len(),
            anchors = engine.anchors.len(),
            decisions = engine.decisions.len(),
            "indices built"
        );
        engine
    }

    fn index_link(&mut self, link: &'a LinkDeclaration) {
        if link.name.is_empty() {
            return;
        }
        if !self.feature_index.contains_key(link.name.as_str()) {
            self.feature_index.insert(&link.name, link);
            self.features.push(link);
        }
        self.graph.add_node(&link.name);
        for dep in &link.depends {
            if !dep.is_empty() {
                self.graph.add_edge(&link.name, dep);
            }
        }

        for (refs, relation) in [
            (&link.files, FileRelation::File),
            (&link.tests, FileRelation::Test),
            (&link.docs, FileRelation::Doc),
        ] {
            for file in refs {
                self.file_index
                    .entry(&file.path)
                    .or_default()
                    .push((&link.name, relation));
            }
        }
    }

    // ========================================================================
    // Feature queries
    // ========================================================================

    pub fn get_feature_files(&self, name: &str) -> Option<FeatureFiles> {
        self.feature_index.get(name).map(|link| feature_files(link))
    }

    pub fn get_feature_dependencies(&self, name: &str) -> Option<DependencyReport> {
        if !self.feature_index.contains_key(name) {
            return None;
        }
        Some(DependencyReport {
            name: name.to_string(),
            direct: self.graph.dependencies_of(name).to_vec(),
            transitive: self.graph.transitive_dependencies(name),
            depth: self.graph.depth_from(name),
        })
    }

    /// Direct dependents only, in declaration order.
    pub fn find_dependents(&self, name: &str) -> Vec<String> {
        self.graph.dependents_of(name).to_vec()
    }

    pub fn get_transitive_dependencies(&self, name: &str) -> Vec<String> {
        self.graph.transitive_dependencies(name)
    }

    pub fn detect_circular_dependencies(&self) -> Vec<Vec<String>> {
        self.graph.cycles()
    }

    /// Features mentioning a file, with the relation kind.
    pub fn features_for_file(&self, path: &str) -> Vec<(String, FileRelation)> {
        self.file_index
            .get(path)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(name, relation)| (name.to_string(), *relation))
                    .collect()
            })
            .unwrap_or_default()
    }

    // ========================================================================
    // Anchor / decision / intent queries
    // ========================================================================

    /// Exact-path anchor lookup.
    pub fn find_anchor_by_path(&self, path: &str) -> Option<AnchorInfo> {
        self.anchor_index.get(path).map(|a| anchor_info(a))
    }

    /// Exact-path heat lookup.
    pub fn find_heat_by_path(&self, path: &str) -> Option<HeatInfo> {
        self.heat_index.get(path).map(|h| heat_info(h))
    }

    /// Anchors whose path or type matches the concept, case-insensitively.
    pub fn find_anchor(&self, concept: &str) -> Vec<AnchorInfo> {
        let needle = concept.to_lowercase();
        self.anchors
            .iter()
            .filter(|a| {
                a.path.to_lowercase().contains(&needle)
                    || a.anchor_type.as_str().contains(&needle)
            })
            .map(|a| anchor_info(a))
            .collect()
    }

    pub fn find_anchors_by_type(&self, anchor_type: AnchorType) -> Vec<AnchorInfo> {
        self.anchors
            .iter()
            .filter(|a| a.anchor_type == anchor_type)
            .map(|a| anchor_info(a))
            .collect()
    }

    /// Decisions whose name contains the pattern.
    pub fn find_decisions(&self, pattern: &str) -> Vec<DecisionInfo> {
        self.decisions
            .iter()
            .filter(|d| d.name.contains(pattern))
            .map(|d| decision_info(d))
            .collect()
    }

    pub fn find_decisions_by_status(&self, status: DecisionStatus) -> Vec<DecisionInfo> {
        self.decisions
            .iter()
            .filter(|d| d.parsed_status() == Some(status))
            .map(|d| decision_info(d))
            .collect()
    }

    /// Decisions whose context list contains the path verbatim.
    pub fn find_decisions_by_context(&self, file: &str) -> Vec<DecisionInfo> {
        self.decisions
            .iter()
            .filter(|d| d.context.iter().any(|c| c == file))
            .map(|d| decision_info(d))
            .collect()
    }

    pub fn find_intent(&self, module: &str, component: &str) -> Option<IntentInfo> {
        self.intent_index
            .get(&(module, component))
            .map(|i| intent_info(i))
    }

    pub fn find_intents_by_module(&self, module: &str) -> Vec<IntentInfo> {
        self.intents
            .iter()
            .filter(|i| i.module == module)
            .map(|i| intent_info(i))
            .collect()
    }

    // ========================================================================
    // Risk
    // ========================================================================

    /// Risk classification for editing one file, with every contributing
    /// factor tagged in `reasons`.
    pub fn get_edit_risk(&self, file: &str) -> RiskAssessment {
        let owning_features = self.features_for_file(file);
        let heat_entries: Vec<&&HeatDeclaration> = self
            .heat
            .iter()
            .filter(|h| covers(&h.path, h.is_glob, file))
            .collect();
        let hotspot = self.anchors.iter().any(|a| {
            a.anchor_type == AnchorType::Hotspot && covers(&a.path, a.is_glob, file)
        });

        let mut reasons = Vec::new();
        let mut max_dependents = 0usize;
        for (feature, _) in &owning_features {
            max_dependents = max_dependents.max(self.graph.dependents_of(feature).len());
        }

        let critical = heat_entries.iter().any(|h| h.heat_type == HeatType::Critical);
        let hot = heat_entries.iter().any(|h| h.heat_type == HeatType::Hot);
        let volatile = heat_entries.iter().any(|h| h.heat_type == HeatType::Volatile);
        let stable = heat_entries.iter().any(|h| h.heat_type == HeatType::Stable);

        if critical {
            reasons.push("critical heat level".to_string());
        }
        if hot {
            reasons.push("hot heat level".to_string());
        }
        if hotspot {
            reasons.push("hotspot area".to_string());
        }
        if volatile {
            reasons.push("volatile heat level".to_string());
        }
        if max_dependents > 0 {
            reasons.push(format!("has {max_dependents} dependents"));
        }
        if stable {
            reasons.push("stable".to_string());
        }

        let level = if owning_features.is_empty() && heat_entries.is_empty() {
            reasons.push("not referenced by any feature or heat entry".to_string());
            RiskLevel::Unknown
        } else if critical || hot || hotspot {
            RiskLevel::High
        } else if volatile || (max_dependents > 0 && !stable) {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        let recommendations = match level {
            RiskLevel::High => vec![
                "run affected tests".to_string(),
                "review dependents before merging".to_string(),
            ],
            RiskLevel::Medium => vec!["run affected tests".to_string()],
            RiskLevel::Unknown => {
                vec!["record the file in a feature or heat entry".to_string()]
            }
            RiskLevel::Low => Vec::new(),
        };

        RiskAssessment {
            file: file.to_string(),
            level,
            reasons,
            recommendations,
        }
    }

    // ========================================================================
    // Impact
    // ========================================================================

    pub fn get_impact_analysis(&self, files: &[String]) -> ImpactAnalysis {
        let mut affected: Vec<String> = Vec::new();
        for file in files {
            for (feature, _) in self.features_for_file(file) {
                push_unique(&mut affected, feature);
            }
        }

        let mut dependent: Vec<String> = Vec::new();
        for feature in &affected {
            for name in self.graph.dependents_of(feature) {
                if !affected.contains(name) {
                    push_unique(&mut dependent, name.clone());
                }
            }
        }

        let mut transitive: Vec<String> = Vec::new();
        for feature in &affected {
            for name in self.graph.transitive_dependents(feature) {
                if !affected.contains(&name) {
                    push_unique(&mut transitive, name);
                }
            }
        }

        let mut tests: Vec<String> = Vec::new();
        for feature in affected.iter().chain(dependent.iter()) {
            if let Some(link) = self.feature_index.get(feature.as_str()) {
                for test in &link.tests {
                    push_unique(&mut tests, test.path.clone());
                }
            }
        }

        let mut affected_files: Vec<String> = Vec::new();
        for file in files {
            for heat in self.heat.iter().filter(|h| covers(&h.path, h.is_glob, file)) {
                for dependent_file in &heat.dependents {
                    push_unique(&mut affected_files, dependent_file.clone());
                }
            }
        }

        ImpactAnalysis {
            input_files: files.to_vec(),
            affected_features: affected,
            dependent_features: dependent,
            transitive_impact: transitive,
            affected_tests: tests,
            affected_files,
        }
    }

    // ========================================================================
    // Work context
    // ========================================================================

    /// Everything relevant for starting work on one feature.
    pub fn get_work_context(&self, name: &str) -> Option<WorkContext> {
        let link = *self.feature_index.get(name)?;
        let feature = feature_files(link);
        let dependencies = self.get_feature_dependencies(name)?;
        let dependents = self.find_dependents(name);

        let mut decisions: Vec<DecisionInfo> = Vec::new();
        for decision_name in &link.decisions {
            if let Some(decision) = self.decision_index.get(decision_name.as_str()) {
                push_unique_by(&mut decisions, decision_info(decision), |d| d.name.clone());
            }
        }
        for path in &feature.files {
            for decision in self.find_decisions_by_context(path) {
                push_unique_by(&mut decisions, decision, |d| d.name.clone());
            }
        }

        let mut anchors: Vec<AnchorInfo> = Vec::new();
        let mut heat: Vec<HeatInfo> = Vec::new();
        let mut risk = RiskLevel::Low;
        for path in feature.files.iter().chain(feature.tests.iter()) {
            for anchor in self
                .anchors
                .iter()
                .filter(|a| covers(&a.path, a.is_glob, path))
            {
                push_unique_by(&mut anchors, anchor_info(anchor), |a| a.path.clone());
            }
            for entry in self.heat.iter().filter(|h| covers(&h.path, h.is_glob, path)) {
                push_unique_by(&mut heat, heat_info(entry), |h| h.path.clone());
            }
            risk = risk.max(self.get_edit_risk(path).level);
        }

        Some(WorkContext {
            feature,
            dependencies,
            dependents,
            decisions,
            anchors,
            heat,
            risk,
        })
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Case-insensitive substring search across every semantic index.
    pub fn semantic_search(&self, query: &str) -> SemanticSearchResults {
        let needle = query.to_lowercase();
        let matches = |text: &str| text.to_lowercase().contains(&needle);
        let opt_matches =
            |text: &Option<String>| text.as_deref().map(matches).unwrap_or(false);

        let anchors = self
            .anchors
            .iter()
            .filter(|a| {
                matches(&a.path) || matches(a.anchor_type.as_str()) || opt_matches(&a.description)
            })
            .map(|a| anchor_info(a))
            .collect();

        let decisions = self
            .decisions
            .iter()
            .filter(|d| matches(&d.name) || opt_matches(&d.reason))
            .map(|d| decision_info(d))
            .collect();

        let intents = self
            .intents
            .iter()
            .filter(|i| {
                matches(&i.module)
                    || matches(&i.component)
                    || opt_matches(&i.does)
                    || opt_matches(&i.does_not)
                    || opt_matches(&i.contract)
            })
            .map(|i| intent_info(i))
            .collect();

        let features = self
            .features
            .iter()
            .filter(|l| {
                matches(&l.name)
                    || l.files.iter().any(|f| matches(&f.path))
                    || opt_matches(&l.why)
            })
            .map(|l| l.name.clone())
            .collect();

        SemanticSearchResults {
            query: query.to_string(),
            anchors,
            decisions,
            intents,
            features,
        }
    }

    // ========================================================================
    // Simulation
    // ========================================================================

    /// Run a what-if operation against a copy of the graph. The indexed
    /// document is never touched.
    pub fn simulate(&self, op: SimulationOp) -> SimulationResult {
        match op {
            SimulationOp::AddDep { from, to } => self.simulate_add_dep(from, to),
            SimulationOp::RemoveDep { from, to } => self.simulate_remove_dep(from, to),
            SimulationOp::AddFeature { name, depends_on } => {
                self.simulate_add_feature(name, depends_on)
            }
            SimulationOp::RemoveFeature { name } => self.simulate_remove_feature(name),
        }
    }

    fn simulate_add_dep(&self, from: String, to: String) -> SimulationResult {
        // a cycle appears iff `to` already reaches `from`
        let circular = to == from || self.graph.reaches(&to, &from);

        let mut modified = self.graph.clone();
        modified.add_edge(&from, &to);

        let before = self.graph.transitive_dependencies(&from);
        let new_dependencies: Vec<String> = modified
            .transitive_dependencies(&from)
            .into_iter()
            .filter(|d| !before.contains(d))
            .collect();

        let mut affected = vec![from.clone()];
        for name in self.graph.transitive_dependents(&from) {
            push_unique(&mut affected, name);
        }

        let graph_position = position_in(&modified, &from);
        self.finish_simulation(
            SimulationOp::AddDep { from, to },
            circular,
            new_dependencies,
            affected,
            Vec::new(),
            graph_position,
        )
    }

    fn simulate_remove_dep(&self, from: String, to: String) -> SimulationResult {
        let mut modified = self.graph.clone();
        modified.remove_edge(&from, &to);

        let mut affected = vec![from.clone()];
        for name in self.graph.transitive_dependents(&from) {
            push_unique(&mut affected, name);
        }

        let graph_position = position_in(&modified, &from);
        self.finish_simulation(
            SimulationOp::RemoveDep { from, to },
            false,
            Vec::new(),
            affected,
            Vec::new(),
            graph_position,
        )
    }

    fn simulate_add_feature(&self, name: String, depends_on: Vec<String>) -> SimulationResult {
        let circular = depends_on.iter().any(|d| d == &name);

        let mut modified = self.graph.clone();
        modified.add_node(&name);
        for dep in &depends_on {
            modified.add_edge(&name, dep);
        }

        let new_dependencies = modified.transitive_dependencies(&name);
        let affected = vec![name.clone()];
        let graph_position = position_in(&modified, &name);
        self.finish_simulation(
            SimulationOp::AddFeature { name, depends_on },
            circular,
            new_dependencies,
            affected,
            Vec::new(),
            graph_position,
        )
    }

    fn simulate_remove_feature(&self, name: String) -> SimulationResult {
        let breaking_dependents = self.graph.dependents_of(&name).to_vec();

        let mut affected = vec![name.clone()];
        for dependent in self.graph.transitive_dependents(&name) {
            push_unique(&mut affected, dependent);
        }

        let graph_position = position_in(&self.graph, &name);
        self.finish_simulation(
            SimulationOp::RemoveFeature { name },
            false,
            Vec::new(),
            affected,
            breaking_dependents,
            graph_position,
        )
    }

    fn finish_simulation(
        &self,
        op: SimulationOp,
        circular: bool,
        new_dependencies: Vec<String>,
        affected_features: Vec<String>,
        breaking_dependents: Vec<String>,
        graph_position: GraphPosition,
    ) -> SimulationResult {
        let total = self.graph.node_count().max(1);
        let share = affected_features.len() as f64 / total as f64;
        let impact_level = if share > 0.5 {
            ImpactLevel::High
        } else if share > 0.2 {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        };

        let mut suggested_tests: Vec<String> = Vec::new();
        for feature in &affected_features {
            if let Some(link) = self.feature_index.get(feature.as_str()) {
                for test in &link.tests {
                    push_unique(&mut suggested_tests, test.path.clone());
                }
            }
        }

        SimulationResult {
            op,
            circular,
            new_dependencies,
            affected_features,
            impact_level,
            breaking_dependents,
            graph_position,
            suggested_tests,
        }
    }
}

/// Exact path equality, or a glob pattern matching the path.
fn covers(pattern: &str, is_glob: bool, path: &str) -> bool {
    if is_glob {
        glob_matches(pattern, path)
    } else {
        pattern == path
    }
}

fn position_in(graph: &DependencyGraph, name: &str) -> GraphPosition {
    let dependencies = graph.dependencies_of(name).len();
    let dependents = graph.dependents_of(name).len();
    let role = match (dependencies, dependents) {
        (0, 0) => "isolated",
        (0, _) => "leaf",
        (_, 0) => "root",
        _ => "internal",
    };
    GraphPosition {
        dependencies,
        dependents,
        role: role.to_string(),
    }
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

fn push_unique_by<T, K: PartialEq>(list: &mut Vec<T>, item: T, key: impl Fn(&T) -> K) {
    let item_key = key(&item);
    if !list.iter().any(|existing| key(existing) == item_key) {
        list.push(item);
    }
}

fn feature_files(link: &LinkDeclaration) -> FeatureFiles {
    FeatureFiles {
        name: link.name.clone(),
        link_type: link.link_type,
        files: link.files.iter().map(|f| f.path.clone()).collect(),
        tests: link.tests.iter().map(|f| f.path.clone()).collect(),
        docs: link.docs.iter().map(|f| f.path.clone()).collect(),
        entry_point: link.entry_point.clone(),
        why: link.why.clone(),
    }
}

fn anchor_info(anchor: &AnchorDeclaration) -> AnchorInfo {
    AnchorInfo {
        anchor_type: anchor.anchor_type,
        path: anchor.path.clone(),
        is_glob: anchor.is_glob,
        description: anchor.description.clone(),
    }
}

fn decision_info(decision: &DecisionDeclaration) -> DecisionInfo {
    DecisionInfo {
        date: decision.date.clone(),
        name: decision.name.clone(),
        status: decision.status.clone(),
        reason: decision.reason.clone(),
        superseded_by: decision.superseded_by.clone(),
    }
}

fn intent_info(intent: &IntentDeclaration) -> IntentInfo {
    IntentInfo {
        module: intent.module.clone(),
        component: intent.component.clone(),
        does: intent.does.clone(),
        does_not: intent.does_not.clone(),
        contract: intent.contract.clone(),
    }
}

fn heat_info(heat: &HeatDeclaration) -> HeatInfo {
    HeatInfo {
        heat_type: heat.heat_type,
        path: heat.path.clone(),
        caution: heat.caution.clone(),
    }
}
