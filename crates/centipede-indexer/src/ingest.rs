//! Ingest stages: turn reader output into back-references.
//!
//! Each call handles exactly one project or solution and touches the
//! graph only through `get_or_create` and `add_back_reference`, so calls
//! for different files can run in parallel.

use crate::readers::{ProjectReader, SolutionReader};
use centipede_core::{ArtifactKind, ReferenceGraph, Result};
use std::path::{Path, PathBuf};

/// What one ingest call added to the graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Back-references newly recorded.
    pub linked: usize,
    /// Entries that did not resolve to a known node.
    pub skipped: usize,
}

/// Records a compile-file → project back-reference for every file the
/// project compiles. The project node is created before the project is
/// read, so it exists even when reading fails.
pub fn ingest_project(
    project_path: &Path,
    graph: &ReferenceGraph,
    reader: &dyn ProjectReader,
) -> Result<IngestOutcome> {
    let project = graph.get_or_create(project_path, ArtifactKind::Project);
    let project_dir = parent_dir(project.path());

    let compiled = reader.read_compiled_files(project.path())?;

    let mut outcome = IngestOutcome::default();
    for entry in compiled {
        let file_path = if entry.is_absolute() {
            entry
        } else {
            project_dir.join(entry)
        };
        let file = graph.get_or_create(&file_path, ArtifactKind::CompileFile);
        if graph.add_back_reference(&file, &project) {
            outcome.linked += 1;
        }
    }

    tracing::debug!(
        "Ingested project {} ({} files linked)",
        project.path().display(),
        outcome.linked
    );
    Ok(outcome)
}

/// Records a project → solution back-reference for every member project
/// that is already in the graph. Members that were never discovered are
/// skipped; this stage never creates project nodes.
pub fn ingest_solution(
    solution_path: &Path,
    graph: &ReferenceGraph,
    reader: &dyn SolutionReader,
) -> Result<IngestOutcome> {
    let solution = graph.get_or_create(solution_path, ArtifactKind::Solution);
    let solution_dir = parent_dir(solution.path());

    let members = reader.read_member_projects(solution.path())?;

    let mut outcome = IngestOutcome::default();
    for member in members {
        let member_path = if member.is_absolute {
            member.path
        } else {
            solution_dir.join(member.path)
        };

        match graph.lookup(&member_path) {
            Some(project) if project.kind() == ArtifactKind::Project => {
                if graph.add_back_reference(&project, &solution) {
                    outcome.linked += 1;
                }
            }
            _ => {
                tracing::debug!(
                    "{} references unindexed project {}",
                    solution.path().display(),
                    member_path.display()
                );
                outcome.skipped += 1;
            }
        }
    }

    tracing::debug!(
        "Ingested solution {} ({} projects linked, {} skipped)",
        solution.path().display(),
        outcome.linked,
        outcome.skipped
    );
    Ok(outcome)
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"))
}
