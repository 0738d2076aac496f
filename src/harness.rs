//! Benchmark stage orchestration.
//!
//! Groups run strictly one after another; within a group, per-question work
//! fans out concurrently and fan-in preserves QA order. That ordering is
//! what keeps the search and response artifacts position-aligned, so the
//! response stage verifies the pairing before zipping the two.

use futures_util::future::try_join_all;
use tracing::info;

use crate::artifacts::{ResponseArtifact, ResponseRecord, SearchArtifact};
use crate::completion::CompletionService;
use crate::dataset::LocomoDataset;
use crate::error::{PairingError, Result};
use crate::ingest::ingest_group;
use crate::memory::MemoryService;
use crate::qa::answer_question;
use crate::retrieval::retrieve_context;

/// Ingest all groups sequentially. Returns the total messages submitted.
pub async fn run_ingest_stage(
    memory: &dyn MemoryService,
    dataset: &LocomoDataset,
    max_groups: usize,
) -> Result<usize> {
    let mut total = 0usize;
    for group in dataset.groups.iter().take(max_groups) {
        total += ingest_group(memory, group).await?;
    }
    info!(groups = dataset.groups.len().min(max_groups), messages = total, "ingest stage done");
    Ok(total)
}

/// Retrieve context for every scoreable question of every group.
pub async fn run_search_stage(
    memory: &dyn MemoryService,
    dataset: &LocomoDataset,
    max_groups: usize,
) -> Result<SearchArtifact> {
    let mut artifact = SearchArtifact::new();

    for group in dataset.groups.iter().take(max_groups) {
        let user_id = group.user_id();
        let questions = group.answerable_qa();

        let records = try_join_all(
            questions
                .iter()
                .map(|qa| retrieve_context(memory, &user_id, &qa.question)),
        )
        .await?;

        info!(group = %user_id, questions = records.len(), "search stage group done");
        artifact.insert(user_id, records);
    }

    Ok(artifact)
}

/// Answer every scoreable question against its retrieved context.
///
/// Search results are matched to questions by position, so the stage first
/// proves both sides enumerate the same sequence.
pub async fn run_response_stage(
    completion: &dyn CompletionService,
    dataset: &LocomoDataset,
    search_results: &SearchArtifact,
    model: &str,
    max_groups: usize,
) -> Result<ResponseArtifact> {
    let mut artifact = ResponseArtifact::new();

    for group in dataset.groups.iter().take(max_groups) {
        let user_id = group.user_id();
        let questions = group.answerable_qa();

        let contexts = search_results
            .get(&user_id)
            .ok_or_else(|| PairingError::MissingGroup { group_id: user_id.clone() })?;
        if questions.len() != contexts.len() {
            return Err(PairingError::CountMismatch {
                group_id: user_id,
                questions: questions.len(),
                results: contexts.len(),
            }
            .into());
        }

        let answered = try_join_all(
            questions
                .iter()
                .zip(contexts.iter())
                .map(|(qa, record)| answer_question(completion, qa, &record.context, model)),
        )
        .await?;
        let records: Vec<ResponseRecord> = answered.into_iter().flatten().collect();

        info!(group = %user_id, answers = records.len(), "response stage group done");
        artifact.insert(user_id, records);
    }

    Ok(artifact)
}
