//! Path normalization and canonical graph keys.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Makes `path` absolute against the current directory and resolves `.`
/// and `..` lexically. The filesystem is never consulted, so symlinks are
/// left alone and the path does not have to exist.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// How two paths are compared for identity.
///
/// Windows-style trees are case-insensitive, so the default folds case by
/// uppercasing the whole path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathCanonicalizer {
    #[default]
    CaseInsensitive,
    CaseSensitive,
}

impl PathCanonicalizer {
    pub fn from_case_sensitive(case_sensitive: bool) -> Self {
        if case_sensitive {
            Self::CaseSensitive
        } else {
            Self::CaseInsensitive
        }
    }

    /// Canonical key for a path: normalized, then case-folded if needed.
    pub fn key(&self, path: &Path) -> String {
        self.fold(&normalize_path(path).to_string_lossy())
    }

    /// Applies only the case rule to an already normalized string.
    pub fn fold(&self, text: &str) -> String {
        match self {
            Self::CaseInsensitive => text.chars().map(upper_one_to_one).collect(),
            Self::CaseSensitive => text.to_string(),
        }
    }

    /// Substring test under the same case rule as keys.
    pub fn contains(&self, haystack: &str, needle: &str) -> bool {
        self.fold(haystack).contains(&self.fold(needle))
    }
}

/// Uppercases `c` only when that yields exactly one char, so `ß` stays
/// `ß` and never matches `SS`.
fn upper_one_to_one(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}
