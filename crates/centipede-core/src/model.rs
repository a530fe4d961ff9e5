//! Core data structures for the reference graph

use dashmap::DashSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Discriminates what part of the build an artifact plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// A source file compiled by a project.
    CompileFile,
    /// A project file (`*.csproj`, `*.vbproj`, ...).
    Project,
    /// A solution file (`*.sln`, `*.slnx`).
    Solution,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CompileFile => "compile_file",
            Self::Project => "project",
            Self::Solution => "solution",
        };
        write!(f, "{}", s)
    }
}

/// One file participating in the build graph.
///
/// Everything except `included_in` is fixed at creation. Back-references
/// are stored as canonical keys of the including nodes, so they are
/// lookups into the graph's node table rather than owned copies.
#[derive(Debug)]
pub struct ArtifactNode {
    key: String,
    path: PathBuf,
    name: String,
    kind: ArtifactKind,
    included_in: DashSet<String>,
}

impl ArtifactNode {
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>, kind: ArtifactKind) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            key: key.into(),
            path,
            name,
            kind,
            included_in: DashSet::new(),
        }
    }

    /// Canonical key this node is registered under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Absolute, normalized path as first seen.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Record that `referrer_key` includes this node. Returns `false` if
    /// it was already recorded. Self-references are refused.
    pub fn add_included_in(&self, referrer_key: &str) -> bool {
        if referrer_key == self.key {
            return false;
        }
        self.included_in.insert(referrer_key.to_string())
    }

    /// Snapshot of the keys of the nodes that include this one.
    pub fn included_in(&self) -> Vec<String> {
        self.included_in.iter().map(|k| k.key().clone()).collect()
    }

    pub fn included_in_count(&self) -> usize {
        self.included_in.len()
    }

    pub fn is_included_in(&self, referrer_key: &str) -> bool {
        self.included_in.contains(referrer_key)
    }
}

impl PartialEq for ArtifactNode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ArtifactNode {}

impl std::hash::Hash for ArtifactNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Serializable view of a node, printed by the CLI's `--json` mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactSummary {
    pub path: PathBuf,
    pub name: String,
    pub kind: ArtifactKind,
    pub included_in: usize,
}

impl From<&ArtifactNode> for ArtifactSummary {
    fn from(node: &ArtifactNode) -> Self {
        Self {
            path: node.path.clone(),
            name: node.name.clone(),
            kind: node.kind,
            included_in: node.included_in_count(),
        }
    }
}
