//! Recursive, parallel discovery of solution and project files.

use crate::config::IndexConfig;
use centipede_core::{BuildLogger, IndexError, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything found under a root. Order carries no meaning.
#[derive(Debug, Default, Clone)]
pub struct Discovery {
    pub solutions: Vec<PathBuf>,
    pub projects: Vec<PathBuf>,
    /// Directories that could not be read and were skipped.
    pub failed_dirs: usize,
}

impl Discovery {
    fn merge(mut self, other: Discovery) -> Discovery {
        self.solutions.extend(other.solutions);
        self.projects.extend(other.projects);
        self.failed_dirs += other.failed_dirs;
        self
    }
}

/// Scan `root` for solution and project files.
///
/// Fails only if `root` is not an existing directory. An unreadable
/// subdirectory is logged and contributes nothing.
pub fn discover(root: &Path, config: &IndexConfig, logger: &dyn BuildLogger) -> Result<Discovery> {
    if !root.is_dir() {
        return Err(IndexError::not_found(root));
    }

    let discovery = discover_dir(root, config, logger);
    tracing::info!(
        "Discovered {} solutions and {} projects under {}",
        discovery.solutions.len(),
        discovery.projects.len(),
        root.display()
    );
    Ok(discovery)
}

fn discover_dir(dir: &Path, config: &IndexConfig, logger: &dyn BuildLogger) -> Discovery {
    tracing::debug!("Processing directory: {}", dir.display());

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            logger.log(&IndexError::access(dir, e).to_string());
            return Discovery {
                failed_dirs: 1,
                ..Discovery::default()
            };
        }
    };

    let mut found = Discovery::default();
    let mut subdirs = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                logger.log(&IndexError::access(dir, e).to_string());
                continue;
            }
        };

        let path = entry.path();
        let is_dir = match entry.file_type() {
            Ok(file_type) => file_type.is_dir(),
            Err(e) => {
                logger.log(&IndexError::access(&path, e).to_string());
                continue;
            }
        };

        if is_dir {
            let name = entry.file_name();
            if config.should_descend(&name.to_string_lossy()) {
                subdirs.push(path);
            }
        } else if path.is_file() {
            if config.is_solution(&path) {
                found.solutions.push(path);
            } else if config.is_project(&path) {
                found.projects.push(path);
            }
        }
    }

    let nested = subdirs
        .par_iter()
        .map(|subdir| discover_dir(subdir, config, logger))
        .reduce(Discovery::default, Discovery::merge);

    found.merge(nested)
}
