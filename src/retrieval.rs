//! Per-question hybrid retrieval.

use std::time::Instant;

use crate::artifacts::SearchRecord;
use crate::context::compose_search_context;
use crate::memory::{MemoryService, SearchRequest};

/// Run both search scopes for one question and compose the context block.
///
/// Node and edge scope are issued concurrently and both must succeed; a
/// failed scope fails the question rather than producing a half context.
/// The reported latency covers both searches plus composition.
pub async fn retrieve_context(
    memory: &dyn MemoryService,
    user_id: &str,
    question: &str,
) -> anyhow::Result<SearchRecord> {
    let start = Instant::now();

    // The requests must outlive the borrowed futures the macro polls.
    let node_request = SearchRequest::node_scope(question, user_id);
    let edge_request = SearchRequest::edge_scope(question, user_id);
    let (node_response, edge_response) = tokio::try_join!(
        memory.search(&node_request),
        memory.search(&edge_request),
    )?;

    let context = compose_search_context(&edge_response.facts, &node_response.entities);
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(SearchRecord { context, duration_ms })
}
