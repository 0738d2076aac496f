//! Benchmark configuration.
//!
//! Loaded from a TOML file; every field has a default so a missing file or a
//! partial file both work. API keys may live in the file or come from the
//! environment, with the file taking precedence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Default config file name, looked up relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "locomo-bench.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub dataset: DatasetConfig,
    pub memory: MemoryConfig,
    pub completion: CompletionConfig,
    pub artifacts: ArtifactsConfig,
}

impl BenchConfig {
    /// Load configuration from a TOML file; an absent file yields defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the benchmark JSON document.
    pub path: PathBuf,
    /// Upper bound on conversation groups processed per run.
    pub max_groups: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("data/locomo.json"), max_groups: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8000/api/v2".to_string(), api_key: None }
    }
}

impl MemoryConfig {
    /// Configured key, falling back to the `MEMORY_API_KEY` environment
    /// variable. `None` for unauthenticated deployments.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), "MEMORY_API_KEY")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Answering model; latency figures are only comparable within one model.
    pub model: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4.1-mini".to_string(),
        }
    }
}

impl CompletionConfig {
    /// Configured key, falling back to the `OPENAI_API_KEY` environment
    /// variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), "OPENAI_API_KEY")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub dir: PathBuf,
    pub search_results: String,
    pub responses: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            search_results: "locomo_search_results.json".to_string(),
            responses: "locomo_responses.json".to_string(),
        }
    }
}

impl ArtifactsConfig {
    pub fn search_results_path(&self) -> PathBuf {
        self.dir.join(&self.search_results)
    }

    pub fn responses_path(&self) -> PathBuf {
        self.dir.join(&self.responses)
    }
}

fn resolve_key(configured: Option<&str>, env_var: &str) -> Option<String> {
    configured
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok().filter(|key| !key.is_empty()))
}
