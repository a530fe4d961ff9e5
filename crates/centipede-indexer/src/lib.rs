//! Discovery, build-file readers and the parallel index builder

pub mod config;
pub mod coordinator;
pub mod discover;
pub mod ingest;
pub mod readers;


#[cfg(test)]
pub mod test_utils;

pub use config::{CONFIG_FILE, IndexConfig};
pub use coordinator::{BuildStats, IndexBuilder, SolutionIndex, build_index};
pub use discover::{Discovery, discover};
pub use ingest::{IngestOutcome, ingest_project, ingest_solution};
pub use readers::{
    MemberProject, MsBuildProjectReader, ProjectReader, SolutionReader, VsSolutionReader,
};
