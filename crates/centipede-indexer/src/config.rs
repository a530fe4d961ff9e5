//! Index configuration, loadable from `centipede.toml`.

use anyhow::Context;
use centipede_core::PathCanonicalizer;
use serde::Deserialize;
use std::path::Path;

/// Config file looked up at the scanned root when none is given.
pub const CONFIG_FILE: &str = "centipede.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Extensions (without dot) that mark a solution file.
    pub solution_extensions: Vec<String>,
    /// Any extension ending in this suffix marks a project file.
    pub project_extension_suffix: String,
    /// Skip directories whose name starts with a dot.
    pub skip_hidden_dirs: bool,
    /// Directory names never descended into.
    pub excluded_dirs: Vec<String>,
    /// Compare paths case-sensitively when building graph keys.
    pub case_sensitive_paths: bool,
    /// Worker pool size. `None` lets rayon pick.
    pub threads: Option<usize>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            solution_extensions: vec!["sln".to_string(), "slnx".to_string()],
            project_extension_suffix: "proj".to_string(),
            skip_hidden_dirs: true,
            excluded_dirs: Vec::new(),
            case_sensitive_paths: false,
            threads: None,
        }
    }
}

impl IndexConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid index configuration")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        tracing::debug!("Loaded index config from {}", path.display());
        Ok(config)
    }

    /// Loads `centipede.toml` from `root` if present, defaults otherwise.
    pub fn discover(root: &Path) -> anyhow::Result<Self> {
        let candidate = root.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn canonicalizer(&self) -> PathCanonicalizer {
        PathCanonicalizer::from_case_sensitive(self.case_sensitive_paths)
    }

    pub fn is_solution(&self, path: &Path) -> bool {
        extension_lowercase(path).is_some_and(|ext| {
            self.solution_extensions
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(&ext))
        })
    }

    /// Matches `*.*proj`: `csproj`, `vbproj`, `vcxproj` and plain `proj`.
    pub fn is_project(&self, path: &Path) -> bool {
        let suffix = self.project_extension_suffix.to_lowercase();
        extension_lowercase(path).is_some_and(|ext| ext.ends_with(&suffix))
    }

    /// Whether the discoverer should descend into a directory named `name`.
    pub fn should_descend(&self, name: &str) -> bool {
        if self.skip_hidden_dirs && name.starts_with('.') {
            return false;
        }
        !self.excluded_dirs.iter().any(|excluded| excluded == name)
    }
}

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}
