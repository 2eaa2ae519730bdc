//! Query response types.
//!
//! Everything the engine hands back is owned, serde-serializable data,
//! detached from the document the engine borrowed.

use mbel_core::EntryPoint;
use mbel_syntax::{AnchorType, HeatType, LinkType};
use serde::{Deserialize, Serialize};

/// How a file is mentioned by a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRelation {
    File,
    Test,
    Doc,
}

/// The file surface of one feature or task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFiles {
    pub name: String,
    pub link_type: LinkType,
    pub files: Vec<String>,
    pub tests: Vec<String>,
    pub docs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point: Option<EntryPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
}

/// Direct and transitive dependencies of one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub name: String,
    pub direct: Vec<String>,
    pub transitive: Vec<String>,
    /// Longest dependency chain below this feature.
    pub depth: usize,
}

/// Edit-risk classification for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Unknown,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub file: String,
    pub level: RiskLevel,
    /// Short tags for every contributing factor.
    pub reasons: Vec<String>,
    /// Non-empty whenever `level` is not `low`.
    pub recommendations: Vec<String>,
}

/// What a set of file edits touches, directly and transitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactAnalysis {
    pub input_files: Vec<String>,
    /// Features mentioning an input file as file, test, or doc.
    pub affected_features: Vec<String>,
    /// Direct dependents of the affected features.
    pub dependent_features: Vec<String>,
    /// Fixed point of the dependents relation.
    pub transitive_impact: Vec<String>,
    pub affected_tests: Vec<String>,
    /// Files listed as dependents in heat entries for the inputs.
    pub affected_files: Vec<String>,
}

/// A compact anchor view for query responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnchorInfo {
    pub anchor_type: AnchorType,
    pub path: String,
    pub is_glob: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A compact decision view for query responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionInfo {
    pub date: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<String>,
}

/// A compact intent view for query responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentInfo {
    pub module: String,
    pub component: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub does_not: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
}

/// A compact heat view for query responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatInfo {
    pub heat_type: HeatType,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caution: Option<String>,
}

/// Everything needed to start working on one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkContext {
    pub feature: FeatureFiles,
    pub dependencies: DependencyReport,
    pub dependents: Vec<String>,
    pub decisions: Vec<DecisionInfo>,
    pub anchors: Vec<AnchorInfo>,
    pub heat: Vec<HeatInfo>,
    pub risk: RiskLevel,
}

/// Union result of a free-text search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticSearchResults {
    pub query: String,
    pub anchors: Vec<AnchorInfo>,
    pub decisions: Vec<DecisionInfo>,
    pub intents: Vec<IntentInfo>,
    pub features: Vec<String>,
}

/// A what-if operation on the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum SimulationOp {
    AddDep { from: String, to: String },
    RemoveDep { from: String, to: String },
    AddFeature {
        name: String,
        #[serde(default)]
        depends_on: Vec<String>,
    },
    RemoveFeature { name: String },
}

/// Share-of-graph severity of a simulated change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

/// Where a node sits in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPosition {
    pub dependencies: usize,
    pub dependents: usize,
    /// `isolated`, `leaf`, `root`, or `internal`.
    pub role: String,
}

/// Result of simulating a change on a virtual copy of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub op: SimulationOp,
    pub circular: bool,
    pub new_dependencies: Vec<String>,
    pub affected_features: Vec<String>,
    pub impact_level: ImpactLevel,
    pub breaking_dependents: Vec<String>,
    pub graph_position: GraphPosition,
    pub suggested_tests: Vec<String>,
}
