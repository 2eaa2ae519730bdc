//! MBEL Query - Semantic Queries over Parsed Documents
//!
//! Builds derivative indices from one [`mbel_syntax::Document`] and answers
//! graph and lookup queries: feature files, dependencies and dependents,
//! cycle detection, anchors, decisions, heat, intents, edit risk, change
//! impact, work-context composition, free-text search, and what-if
//! simulation on a virtual copy of the graph.
//!
//! The engine holds references into the document; the document must outlive
//! the engine, and rebuilding is the way to pick up changes.

mod engine;
mod glob;
mod graph;
mod types;

pub use engine::QueryEngine;
pub use glob::glob_matches;
pub use graph::DependencyGraph;
pub use types::*;
