#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use locomo_bench::cli::{Cli, Commands};
use locomo_bench::completion::OpenAiCompletion;
use locomo_bench::memory::GraphMemoryClient;
use locomo_bench::{BenchConfig, LocomoDataset, artifacts, harness};

#[tokio::main]
async fn main() -> Result<()> {
    // Install default crypto provider for Rustls TLS.
    // This prevents the error: "could not automatically determine the process-level CryptoProvider"
    // when both aws-lc-rs and ring features are available (or neither is explicitly selected).
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let mut config = BenchConfig::load(&cli.config)?;
    if let Some(dataset) = cli.dataset {
        config.dataset.path = dataset;
    }

    run(cli.command, config).await
}

async fn run(command: Commands, config: BenchConfig) -> Result<()> {
    let dataset = LocomoDataset::from_file(&config.dataset.path)?;
    let max_groups = config.dataset.max_groups;

    match command {
        Commands::Ingest => {
            let memory = GraphMemoryClient::new(
                &config.memory.base_url,
                config.memory.resolved_api_key().as_deref(),
            );
            let messages = harness::run_ingest_stage(&memory, &dataset, max_groups).await?;
            info!(messages, "ingestion complete");
        }
        Commands::Search => {
            let memory = GraphMemoryClient::new(
                &config.memory.base_url,
                config.memory.resolved_api_key().as_deref(),
            );
            let artifact = harness::run_search_stage(&memory, &dataset, max_groups).await?;
            let path = config.artifacts.search_results_path();
            artifacts::save_json(&path, &artifact)?;
            info!(path = %path.display(), "search results saved");
        }
        Commands::Respond => {
            let completion = OpenAiCompletion::new(
                &config.completion.base_url,
                config.completion.resolved_api_key().as_deref(),
            );
            let search: artifacts::SearchArtifact =
                artifacts::load_json(&config.artifacts.search_results_path())?;
            let artifact = harness::run_response_stage(
                &completion,
                &dataset,
                &search,
                &config.completion.model,
                max_groups,
            )
            .await?;
            let path = config.artifacts.responses_path();
            artifacts::save_json(&path, &artifact)?;
            info!(path = %path.display(), "responses saved");
        }
    }
    Ok(())
}
