//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

/// Benchmark harness measuring temporal memory services on long-horizon
/// conversational QA.
#[derive(Parser, Debug)]
#[command(name = "locomo-bench", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the dataset path from the configuration file.
    #[arg(long, global = true)]
    pub dataset: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest every conversation group into the memory service.
    Ingest,
    /// Run hybrid retrieval per question and write the search artifact.
    Search,
    /// Answer each question from the search artifact and write responses.
    Respond,
}
