//! Readers that extract membership relations from build files.
//!
//! The ingest stages only depend on the two traits here; the concrete
//! readers for MSBuild projects and Visual Studio solutions live in the
//! submodules.

pub mod msbuild;
pub mod solution;

use centipede_core::Result;
use std::path::{Path, PathBuf};

pub use msbuild::MsBuildProjectReader;
pub use solution::VsSolutionReader;

/// One project entry listed by a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProject {
    pub path: PathBuf,
    pub is_absolute: bool,
}

impl MemberProject {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_absolute = path.is_absolute();
        Self { path, is_absolute }
    }
}

/// Lists the source files a project compiles.
pub trait ProjectReader: Send + Sync {
    /// Paths are absolute, or relative to the project's directory.
    fn read_compiled_files(&self, project_path: &Path) -> Result<Vec<PathBuf>>;
}

/// Lists the projects a solution references.
pub trait SolutionReader: Send + Sync {
    fn read_member_projects(&self, solution_path: &Path) -> Result<Vec<MemberProject>>;
}

/// Converts `\`-separated build-file paths to the host separator.
pub(crate) fn to_host_separators(raw: &str) -> String {
    if std::path::MAIN_SEPARATOR == '\\' {
        raw.replace('/', "\\")
    } else {
        raw.replace('\\', "/")
    }
}
