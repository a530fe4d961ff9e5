//! CLI command implementations

use crate::Cli;
use anyhow::Context;
use centipede_core::{ArtifactSummary, TracingLogger};
use centipede_indexer::{IndexBuilder, IndexConfig, SolutionIndex};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

const PROMPT: &str = "centipede> ";

/// Config from `--config` or `ROOT/centipede.toml`, with CLI overrides.
pub fn load_config(cli: &Cli) -> anyhow::Result<IndexConfig> {
    let mut config = match &cli.config {
        Some(path) => IndexConfig::load(path)?,
        None => IndexConfig::discover(&cli.root)?,
    };

    if cli.case_sensitive {
        config.case_sensitive_paths = true;
    }
    if cli.threads.is_some() {
        config.threads = cli.threads;
    }
    Ok(config)
}

pub fn index(root: &Path, config: IndexConfig) -> anyhow::Result<SolutionIndex> {
    eprintln!("Processing files under {} ... ", root.display());

    let index = IndexBuilder::new()
        .with_config(config)
        .build(root, &TracingLogger)
        .with_context(|| format!("failed to index {}", root.display()))?;

    eprintln!("Done");
    tracing::debug!("Build stats: {:?}", index.stats());
    Ok(index)
}

/// Print the solutions that include any of `files`.
pub fn batch(
    index: &SolutionIndex,
    files: &[PathBuf],
    json: bool,
    mut out: impl Write,
) -> anyhow::Result<()> {
    let solutions = index.resolve_solutions_for_all(files);

    if json {
        let summaries: Vec<ArtifactSummary> = solutions
            .iter()
            .filter_map(|path| index.graph().lookup(path))
            .map(|node| ArtifactSummary::from(node.as_ref()))
            .collect();
        serde_json::to_writer(&mut out, &summaries)?;
        writeln!(out)?;
    } else if solutions.is_empty() {
        writeln!(out, "No result.")?;
    } else {
        writeln!(out, "Solutions:")?;
        for solution in &solutions {
            writeln!(out, "{}", solution.display())?;
        }
    }
    Ok(())
}

/// Read queries from `input` until `exit` or end of input.
pub fn interactive(
    index: &SolutionIndex,
    mut input: impl BufRead,
    mut out: impl Write,
) -> anyhow::Result<()> {
    let mut line = String::new();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        if let Flow::Exit = handle_query(index, line.trim(), &mut out)? {
            break;
        }
    }
    Ok(())
}

enum Flow {
    Continue,
    Exit,
}

fn handle_query(index: &SolutionIndex, input: &str, out: &mut impl Write) -> anyhow::Result<Flow> {
    if input.is_empty() {
        return Ok(Flow::Continue);
    }
    if input.eq_ignore_ascii_case("exit") {
        return Ok(Flow::Exit);
    }

    // `?text` lists indexed paths, standing in for tab completion.
    if let Some(text) = input.strip_prefix('?') {
        let matches = index.search_file_names(text.trim());
        if matches.is_empty() {
            writeln!(out, "No indexed path contains {}.", text.trim())?;
        }
        for path in matches {
            writeln!(out, "{}", path.display())?;
        }
        return Ok(Flow::Continue);
    }

    let solutions = index.resolve_solutions(Path::new(input));
    if solutions.is_empty() {
        writeln!(out, "No result for {}.", input)?;
    } else {
        writeln!(out, "This file is in the following solutions:")?;
        for solution in solutions {
            writeln!(out, "{}", solution.display())?;
        }
    }
    Ok(Flow::Continue)
}
