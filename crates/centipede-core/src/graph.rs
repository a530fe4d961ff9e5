//! Concurrent reference graph keyed by canonical path.
//!
//! All writes go through two atomic primitives: [`ReferenceGraph::get_or_create_with`]
//! and [`ReferenceGraph::add_back_reference`]. There is no lock over the
//! whole graph; the node table and each node's back-reference set are
//! sharded `DashMap`s.

use crate::canonical::{PathCanonicalizer, normalize_path};
use crate::model::{ArtifactKind, ArtifactNode};
use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;

/// Index of every known compile file, project and solution.
pub struct ReferenceGraph {
    nodes: DashMap<String, Arc<ArtifactNode>>,
    canonicalizer: PathCanonicalizer,
}

impl std::fmt::Debug for ReferenceGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceGraph")
            .field("node_count", &self.nodes.len())
            .field("canonicalizer", &self.canonicalizer)
            .finish()
    }
}

impl ReferenceGraph {
    pub fn new() -> Self {
        Self::with_canonicalizer(PathCanonicalizer::default())
    }

    pub fn with_canonicalizer(canonicalizer: PathCanonicalizer) -> Self {
        ReferenceGraph {
            nodes: DashMap::new(),
            canonicalizer,
        }
    }

    pub fn canonicalizer(&self) -> PathCanonicalizer {
        self.canonicalizer
    }

    /// Canonical key for `path` under this graph's case rule.
    pub fn key_for(&self, path: &Path) -> String {
        self.canonicalizer.key(path)
    }

    /// Returns the node registered under `key`, creating it with `factory`
    /// if there is none. Racing callers all get the same winning node; a
    /// losing factory result is never observable.
    pub fn get_or_create_with<F>(&self, key: &str, factory: F) -> Arc<ArtifactNode>
    where
        F: FnOnce() -> ArtifactNode,
    {
        if let Some(existing) = self.nodes.get(key) {
            return Arc::clone(existing.value());
        }

        let entry = self
            .nodes
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(factory()));
        Arc::clone(entry.value())
    }

    /// Get or create the node for `path`. An existing node keeps its kind.
    pub fn get_or_create(&self, path: &Path, kind: ArtifactKind) -> Arc<ArtifactNode> {
        let normalized = normalize_path(path);
        let key = self.canonicalizer.fold(&normalized.to_string_lossy());
        self.get_or_create_with(&key, || ArtifactNode::new(key.clone(), normalized, kind))
    }

    /// Record that `referrer` includes `node`. No-op if already recorded.
    pub fn add_back_reference(&self, node: &ArtifactNode, referrer: &ArtifactNode) -> bool {
        node.add_included_in(referrer.key())
    }

    /// Probe by canonical key. Never creates.
    pub fn lookup_key(&self, key: &str) -> Option<Arc<ArtifactNode>> {
        self.nodes.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Probe by path, canonicalized the same way node keys are.
    pub fn lookup(&self, path: &Path) -> Option<Arc<ArtifactNode>> {
        self.lookup_key(&self.key_for(path))
    }

    /// Snapshot of all nodes, in no particular order.
    pub fn all_values(&self) -> Vec<Arc<ArtifactNode>> {
        self.nodes.iter().map(|r| Arc::clone(r.value())).collect()
    }

    pub fn nodes_of_kind(&self, kind: ArtifactKind) -> Vec<Arc<ArtifactNode>> {
        self.nodes
            .iter()
            .filter(|r| r.value().kind() == kind)
            .map(|r| Arc::clone(r.value()))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of back-references across all nodes.
    pub fn back_reference_count(&self) -> usize {
        self.nodes.iter().map(|r| r.value().included_in_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for ReferenceGraph {
    fn default() -> Self {
        Self::new()
    }
}
