//! Read-only queries over the reference graph.

use crate::graph::ReferenceGraph;
use crate::model::{ArtifactKind, ArtifactNode};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Every solution that transitively includes `file_path`, sorted by path.
///
/// A path that is not indexed yields an empty result. The walk climbs
/// back-references depth-first, stops at solutions, and never enters a
/// node twice, so it terminates even on a cyclic graph.
pub fn resolve_solutions(graph: &ReferenceGraph, file_path: &Path) -> Vec<Arc<ArtifactNode>> {
    let Some(start) = graph.lookup(file_path) else {
        tracing::debug!("No indexed file for {}", file_path.display());
        return Vec::new();
    };

    // Keyed by the path string so the order is plain lexicographic.
    let mut found: BTreeMap<String, Arc<ArtifactNode>> = BTreeMap::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack = vec![start];

    while let Some(node) = stack.pop() {
        if !visited.insert(node.key().to_string()) {
            continue;
        }

        if node.kind() == ArtifactKind::Solution {
            found.insert(node.path().to_string_lossy().into_owned(), node);
            continue;
        }

        for referrer_key in node.included_in() {
            if visited.contains(&referrer_key) {
                continue;
            }
            match graph.lookup_key(&referrer_key) {
                Some(referrer) => stack.push(referrer),
                None => tracing::warn!(
                    "Dangling back-reference {} from {}",
                    referrer_key,
                    node.path().display()
                ),
            }
        }
    }

    found.into_values().collect()
}

/// Paths of [`resolve_solutions`], for callers that only print them.
pub fn resolve_solution_paths(graph: &ReferenceGraph, file_path: &Path) -> Vec<PathBuf> {
    resolve_solutions(graph, file_path)
        .iter()
        .map(|n| n.path().to_path_buf())
        .collect()
}

/// Indexed paths containing `substring`, sorted lexicographically.
/// Matching follows the graph's case rule.
pub fn search_file_names(graph: &ReferenceGraph, substring: &str) -> Vec<PathBuf> {
    let canonicalizer = graph.canonicalizer();
    let mut matches: Vec<(String, PathBuf)> = graph
        .all_values()
        .iter()
        .map(|n| (n.path().to_string_lossy().into_owned(), n.path().to_path_buf()))
        .filter(|(text, _)| canonicalizer.contains(text, substring))
        .collect();
    matches.sort_by(|a, b| a.0.cmp(&b.0));
    matches.into_iter().map(|(_, path)| path).collect()
}
