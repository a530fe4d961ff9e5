//! Centipede Core — artifact model, reference graph and solution resolution

pub mod canonical;
pub mod error;
pub mod graph;
pub mod logger;
pub mod model;
pub mod resolve;


pub use canonical::{PathCanonicalizer, normalize_path};
pub use error::{IndexError, Result};
pub use graph::ReferenceGraph;
pub use logger::{BuildLogger, MemoryLogger, NullLogger, TracingLogger};
pub use model::{ArtifactKind, ArtifactNode, ArtifactSummary};
pub use resolve::{resolve_solution_paths, resolve_solutions, search_file_names};
