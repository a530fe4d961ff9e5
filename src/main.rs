//! Centipede CLI entry point

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "centipede", version)]
#[command(
    about = "Find the Visual Studio solutions that build a file",
    long_about = "Indexes every solution and project under ROOT, then reports which \
                  solutions transitively include each FILE. Without FILES, starts an \
                  interactive prompt: enter a file path, `?text` to search indexed \
                  paths, or `exit` to quit."
)]
pub struct Cli {
    /// Directory to index
    root: PathBuf,

    /// Files to look up; starts interactive mode when empty
    files: Vec<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Index configuration file (defaults to ROOT/centipede.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat paths as case-sensitive
    #[arg(long)]
    case_sensitive: bool,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Print batch results as a JSON array
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("centipede={}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Centipede v{}", env!("CARGO_PKG_VERSION"));

    let config = commands::load_config(&cli)?;
    let index = commands::index(&cli.root, config)?;

    if cli.files.is_empty() {
        let stdin = std::io::stdin();
        commands::interactive(&index, stdin.lock(), std::io::stdout())
    } else {
        commands::batch(&index, &cli.files, cli.json, std::io::stdout())
    }
}
