//! Stage artifacts persisted between benchmark stages.
//!
//! Each stage writes pretty-printed JSON keyed by group user id, so a stage
//! can be re-run or inspected without holding earlier stages in memory. The
//! search artifact feeds the response stage; both feed external scorers.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// One question's retrieval outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Composed context block handed to the answering model.
    pub context: String,
    /// Wall time of the hybrid search plus composition, in milliseconds.
    pub duration_ms: f64,
}

/// One question's answering outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub question: String,
    /// Model answer; empty when the model returned no content.
    pub answer: String,
    pub golden_answer: String,
    /// Wall time of prompt assembly plus the completion call, in milliseconds.
    pub duration_ms: f64,
}

/// Search stage output: group user id to per-question records, in QA order.
pub type SearchArtifact = BTreeMap<String, Vec<SearchRecord>>;

/// Response stage output, position-aligned with the search artifact.
pub type ResponseArtifact = BTreeMap<String, Vec<ResponseRecord>>;

/// Write an artifact as pretty JSON, creating parent directories as needed.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("failed to create artifact directory {}", parent.display())
        })?;
    }
    let json = serde_json::to_string_pretty(value).context("failed to serialize artifact")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write artifact {}", path.display()))?;
    Ok(())
}

/// Read an artifact written by [`save_json`].
pub fn load_json<T: for<'de> Deserialize<'de>>(path: &Path) -> anyhow::Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read artifact {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse artifact {}", path.display()))
}
