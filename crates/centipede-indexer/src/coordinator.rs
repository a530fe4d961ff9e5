//! Orchestrates parallel indexing
//!
//! A build runs three stages on one rayon pool: discovery, project ingest
//! and solution ingest. Every project is ingested before any solution is,
//! so a solution can only link to projects that were actually discovered.

use crate::config::IndexConfig;
use crate::discover::discover;
use crate::ingest::{IngestOutcome, ingest_project, ingest_solution};
use crate::readers::{MsBuildProjectReader, ProjectReader, SolutionReader, VsSolutionReader};
use centipede_core::{
    BuildLogger, IndexError, ReferenceGraph, Result, normalize_path, resolve_solution_paths,
    search_file_names,
};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Counters collected during one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub solutions: usize,
    pub projects: usize,
    pub failed_solutions: usize,
    pub failed_projects: usize,
    pub failed_dirs: usize,
    /// Solution entries naming projects that were never discovered.
    pub skipped_project_references: usize,
    pub nodes: usize,
    pub back_references: usize,
    pub elapsed_ms: u64,
}

impl BuildStats {
    pub fn failures(&self) -> usize {
        self.failed_solutions + self.failed_projects + self.failed_dirs
    }
}

/// A fully built, read-only index over one root.
#[derive(Debug)]
pub struct SolutionIndex {
    graph: ReferenceGraph,
    stats: BuildStats,
}

impl SolutionIndex {
    pub fn graph(&self) -> &ReferenceGraph {
        &self.graph
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    /// Solutions that transitively include `file_path`, sorted by path.
    pub fn resolve_solutions(&self, file_path: &Path) -> Vec<PathBuf> {
        resolve_solution_paths(&self.graph, file_path)
    }

    /// Union of [`Self::resolve_solutions`] over every path in `files`.
    pub fn resolve_solutions_for_all<P: AsRef<Path>>(&self, files: &[P]) -> Vec<PathBuf> {
        let mut union = BTreeMap::new();
        for file in files {
            for solution in self.resolve_solutions(file.as_ref()) {
                union
                    .entry(solution.to_string_lossy().into_owned())
                    .or_insert(solution);
            }
        }
        union.into_values().collect()
    }

    /// Indexed paths whose text contains `substring`.
    pub fn search_file_names(&self, substring: &str) -> Vec<PathBuf> {
        search_file_names(&self.graph, substring)
    }
}

/// Builds a [`SolutionIndex`]. Readers can be swapped for testing or for
/// other build systems.
#[derive(Clone)]
pub struct IndexBuilder {
    config: IndexConfig,
    project_reader: Arc<dyn ProjectReader>,
    solution_reader: Arc<dyn SolutionReader>,
}

impl std::fmt::Debug for IndexBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexBuilder {
    pub fn new() -> Self {
        IndexBuilder {
            config: IndexConfig::default(),
            project_reader: Arc::new(MsBuildProjectReader),
            solution_reader: Arc::new(VsSolutionReader),
        }
    }

    pub fn with_config(mut self, config: IndexConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_project_reader(mut self, reader: impl ProjectReader + 'static) -> Self {
        self.project_reader = Arc::new(reader);
        self
    }

    pub fn with_solution_reader(mut self, reader: impl SolutionReader + 'static) -> Self {
        self.solution_reader = Arc::new(reader);
        self
    }

    /// Index everything under `root`.
    ///
    /// Only a missing root is an error. Unreadable directories and
    /// unparsable build files are reported to `logger` and counted in
    /// [`BuildStats`]; the rest of the index is still built.
    pub fn build(&self, root: &Path, logger: &dyn BuildLogger) -> Result<SolutionIndex> {
        let start = Instant::now();
        let root = normalize_path(root);
        if !root.is_dir() {
            return Err(IndexError::not_found(root));
        }

        tracing::info!("Indexing {}", root.display());
        let graph = ReferenceGraph::with_canonicalizer(self.config.canonicalizer());

        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.unwrap_or(0))
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                tracing::warn!("Failed to create thread pool, using global pool: {}", e);
                None
            }
        };

        let run = || self.run_stages(&root, &graph, logger);
        let mut stats = match &pool {
            Some(pool) => pool.install(run)?,
            None => run()?,
        };

        stats.nodes = graph.node_count();
        stats.back_references = graph.back_reference_count();
        stats.elapsed_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Indexed {} solutions, {} projects, {} nodes in {}ms ({} failures)",
            stats.solutions,
            stats.projects,
            stats.nodes,
            stats.elapsed_ms,
            stats.failures()
        );

        Ok(SolutionIndex { graph, stats })
    }

    fn run_stages(
        &self,
        root: &Path,
        graph: &ReferenceGraph,
        logger: &dyn BuildLogger,
    ) -> Result<BuildStats> {
        let discovery = discover(root, &self.config, logger)?;

        let projects = run_ingest_stage(&discovery.projects, logger, |path| {
            ingest_project(path, graph, self.project_reader.as_ref())
        });
        // par_iter's for_each returns only after every project is done.
        let solutions = run_ingest_stage(&discovery.solutions, logger, |path| {
            ingest_solution(path, graph, self.solution_reader.as_ref())
        });

        Ok(BuildStats {
            solutions: discovery.solutions.len(),
            projects: discovery.projects.len(),
            failed_solutions: solutions.failed,
            failed_projects: projects.failed,
            failed_dirs: discovery.failed_dirs,
            skipped_project_references: solutions.skipped,
            ..BuildStats::default()
        })
    }
}

#[derive(Debug, Default)]
struct StageTotals {
    failed: usize,
    skipped: usize,
}

fn run_ingest_stage<F>(paths: &[PathBuf], logger: &dyn BuildLogger, ingest: F) -> StageTotals
where
    F: Fn(&Path) -> Result<IngestOutcome> + Sync,
{
    let failed = AtomicUsize::new(0);
    let skipped = AtomicUsize::new(0);

    paths.par_iter().for_each(|path| match ingest(path.as_path()) {
        Ok(outcome) => {
            skipped.fetch_add(outcome.skipped, Ordering::Relaxed);
        }
        Err(e) => {
            failed.fetch_add(1, Ordering::Relaxed);
            logger.log(&e.to_string());
        }
    });

    StageTotals {
        failed: failed.into_inner(),
        skipped: skipped.into_inner(),
    }
}

/// Build an index of `root` with default configuration.
pub fn build_index(root: &Path, logger: &dyn BuildLogger) -> Result<SolutionIndex> {
    IndexBuilder::new().build(root, logger)
}
