//! Dependency graph over feature names.
//!
//! Adjacency lists keyed by name, never node-to-node pointers; the graph
//! owns cloned name strings so simulation can work on a plain copy. All
//! traversals use visited sets and are deterministic: adjacency lists keep
//! source order.

use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    forward: HashMap<String, Vec<String>>,
    reverse: HashMap<String, Vec<String>>,
    /// Node names in insertion order, for deterministic whole-graph walks.
    nodes: Vec<String>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: &str) {
        if !self.forward.contains_key(name) {
            self.forward.insert(name.to_string(), Vec::new());
            self.reverse.insert(name.to_string(), Vec::new());
            self.nodes.push(name.to_string());
        }
    }

    /// `from` depends on `to`. Both endpoints become nodes.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.add_node(from);
        self.add_node(to);
        if let Some(deps) = self.forward.get_mut(from) {
            if !deps.iter().any(|d| d == to) {
                deps.push(to.to_string());
            }
        }
        if let Some(dependents) = self.reverse.get_mut(to) {
            if !dependents.iter().any(|d| d == from) {
                dependents.push(from.to_string());
            }
        }
    }

    pub fn remove_edge(&mut self, from: &str, to: &str) {
        if let Some(deps) = self.forward.get_mut(from) {
            deps.retain(|d| d != to);
        }
        if let Some(dependents) = self.reverse.get_mut(to) {
            dependents.retain(|d| d != from);
        }
    }

    pub fn remove_node(&mut self, name: &str) {
        self.forward.remove(name);
        self.reverse.remove(name);
        self.nodes.retain(|n| n != name);
        for deps in self.forward.values_mut() {
            deps.retain(|d| d != name);
        }
        for dependents in self.reverse.values_mut() {
            dependents.retain(|d| d != name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.forward.contains_key(name)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Direct dependencies, in declaration order.
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.forward.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Direct dependents, in declaration order.
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.reverse.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Depth-first transitive closure along `forward` edges, excluding the
    /// start node. Cycle-safe via the visited set.
    pub fn transitive_dependencies(&self, name: &str) -> Vec<String> {
        self.closure(name, &self.forward)
    }

    /// Depth-first transitive closure along `reverse` edges.
    pub fn transitive_dependents(&self, name: &str) -> Vec<String> {
        self.closure(name, &self.reverse)
    }

    fn closure(&self, start: &str, edges: &HashMap<String, Vec<String>>) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        let mut stack: Vec<&str> = edges
            .get(start)
            .map(|next| next.iter().rev().map(String::as_str).collect())
            .unwrap_or_default();

        while let Some(current) = stack.pop() {
            if current == start || result.iter().any(|r| r == current) {
                continue;
            }
            result.push(current.to_string());
            if let Some(next) = edges.get(current) {
                for n in next.iter().rev() {
                    stack.push(n);
                }
            }
        }
        result
    }

    /// Whether `to` is reachable from `from` along dependency edges.
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        self.transitive_dependencies(from).iter().any(|d| d == to)
    }

    /// Longest dependency chain below `name`. Cycles contribute their
    /// acyclic prefix.
    pub fn depth_from(&self, name: &str) -> usize {
        fn walk(graph: &DependencyGraph, node: &str, path: &mut Vec<String>) -> usize {
            let mut best = 0;
            for dep in graph.dependencies_of(node) {
                if path.iter().any(|p| p == dep) {
                    continue;
                }
                path.push(dep.clone());
                best = best.max(1 + walk(graph, dep, path));
                path.pop();
            }
            best
        }
        walk(self, name, &mut vec![name.to_string()])
    }

    /// Every elementary cycle, reported once. Each cycle starts and ends at
    /// its entry node; rotations of an already-reported cycle are dropped.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut found: Vec<Vec<String>> = Vec::new();

        for origin in &self.nodes {
            let mut path = vec![origin.clone()];
            self.cycle_dfs(origin, origin, &mut path, &mut found);
        }
        found
    }

    fn cycle_dfs(
        &self,
        origin: &str,
        current: &str,
        path: &mut Vec<String>,
        found: &mut Vec<Vec<String>>,
    ) {
        for dep in self.dependencies_of(current) {
            if dep == origin {
                let mut cycle = path.clone();
                cycle.push(origin.to_string());
                if !found.iter().any(|seen| same_cycle(seen, &cycle)) {
                    found.push(cycle);
                }
                continue;
            }
            if path.iter().any(|p| p == dep) {
                continue;
            }
            path.push(dep.clone());
            self.cycle_dfs(origin, dep, path, found);
            path.pop();
        }
    }
}

/// Cycles are equal up to rotation of the repeated endpoint.
fn same_cycle(a: &[String], b: &[String]) -> bool {
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
