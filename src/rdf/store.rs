//! RDF quad store implementation
//!
//! An in-memory store partitioned by document graph. Each graph keeps its
//! statements in insertion order, so "first match" means "first inserted".

use super::types::{Quad, QuadPattern, Reference};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Store shared between a client and every document it hands out
pub type SharedStore = Arc<RwLock<QuadStore>>;

/// Quad store with one insertion-ordered statement set per document graph
#[derive(Debug, Clone, Default)]
pub struct QuadStore {
    graphs: HashMap<Reference, IndexSet<Quad>>,
}

impl QuadStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            graphs: HashMap::new(),
        }
    }

    /// Wrap a new empty store for sharing
    pub fn shared() -> SharedStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Insert a quad; returns false if it was already present
    pub fn insert(&mut self, quad: Quad) -> bool {
        self.graphs
            .entry(quad.graph.clone())
            .or_default()
            .insert(quad)
    }

    /// Insert several quads, skipping duplicates
    pub fn insert_all(&mut self, quads: impl IntoIterator<Item = Quad>) -> usize {
        let mut inserted = 0;
        for quad in quads {
            if self.insert(quad) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Remove a quad; returns false if it was not present
    pub fn remove(&mut self, quad: &Quad) -> bool {
        let Some(graph) = self.graphs.get_mut(&quad.graph) else {
            return false;
        };
        // shift_remove keeps the remaining statements in insertion order
        let removed = graph.shift_remove(quad);
        if graph.is_empty() {
            self.graphs.remove(&quad.graph);
        }
        removed
    }

    /// Replace every statement of a graph
    pub fn replace_graph(&mut self, graph: &str, quads: impl IntoIterator<Item = Quad>) {
        let statements: IndexSet<Quad> = quads
            .into_iter()
            .map(|quad| quad.in_graph(graph))
            .collect();
        debug!(graph = %graph, statements = statements.len(), "replacing graph");
        if statements.is_empty() {
            self.graphs.remove(graph);
        } else {
            self.graphs.insert(graph.to_string(), statements);
        }
    }

    /// Check if a quad exists in the store
    pub fn contains(&self, quad: &Quad) -> bool {
        self.graphs
            .get(&quad.graph)
            .map(|graph| graph.contains(quad))
            .unwrap_or(false)
    }

    /// Get the total number of quads
    pub fn len(&self) -> usize {
        self.graphs.values().map(IndexSet::len).sum()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Quads matching a pattern, in insertion order
    pub fn match_quads(&self, pattern: &QuadPattern) -> Vec<Quad> {
        self.graphs
            .get(&pattern.graph)
            .map(|graph| {
                graph
                    .iter()
                    .filter(|quad| pattern.matches(quad))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}
