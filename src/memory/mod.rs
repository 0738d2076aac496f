//! Temporal memory service port.
//!
//! The benchmark talks to the memory system through [`MemoryService`]: user
//! and session registration, sequential message ingestion, and scoped graph
//! search. The REST implementation lives in [`client`].

pub mod client;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use client::GraphMemoryClient;

/// Result limit requested from each search scope.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

// ─────────────────────────── Messages ───────────────────────────

/// Role a speaker plays relative to the conversation owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerRole {
    /// The primary speaker the memory graph is built around.
    User,
    /// The other participant in the dialogue.
    Peer,
}

impl SpeakerRole {
    /// Classify a speaker by name against the group's primary speaker.
    pub fn classify(speaker: &str, primary: &str) -> Self {
        if speaker == primary { Self::User } else { Self::Peer }
    }
}

/// One dialogue turn as submitted to the memory service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryMessage {
    /// Speaker name, kept verbatim so the graph can attribute facts.
    pub role: String,
    pub role_type: SpeakerRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ─────────────────────────── Search ───────────────────────────

/// Which graph layer a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SearchScope {
    Nodes,
    Edges,
}

/// Reranker applied to candidate results within a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Reranker {
    Rrf,
    CrossEncoder,
}

/// A single scoped search against the memory graph.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub user_id: String,
    pub scope: SearchScope,
    pub reranker: Reranker,
    pub limit: usize,
}

impl SearchRequest {
    /// Entity search: node scope under reciprocal rank fusion.
    pub fn node_scope(query: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_id: user_id.into(),
            scope: SearchScope::Nodes,
            reranker: Reranker::Rrf,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Fact search: edge scope under cross-encoder reranking.
    pub fn edge_scope(query: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_id: user_id.into(),
            scope: SearchScope::Edges,
            reranker: Reranker::CrossEncoder,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

/// A temporal fact edge returned by an edge-scope search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedFact {
    pub fact: String,
    #[serde(default)]
    pub valid_at: Option<String>,
    #[serde(default)]
    pub invalid_at: Option<String>,
}

/// An entity node returned by a node-scope search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedEntity {
    pub name: String,
    pub summary: String,
}

/// Typed search payload. Entities only populate from node-scope calls and
/// facts from edge-scope calls; the other list deserializes empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "nodes", default)]
    pub entities: Vec<RetrievedEntity>,
    #[serde(rename = "edges", default)]
    pub facts: Vec<RetrievedFact>,
}

// ─────────────────────────── Port ───────────────────────────

/// Temporal memory backend the benchmark drives.
#[async_trait]
pub trait MemoryService: Send + Sync {
    /// Register the benchmark user a group's graph is scoped to.
    async fn register_user(&self, user_id: &str, first_name: &str) -> anyhow::Result<()>;

    /// Create the ingestion session owned by `user_id`.
    async fn create_session(&self, session_id: &str, user_id: &str) -> anyhow::Result<()>;

    /// Append one message to a session. Callers submit strictly one at a
    /// time so graph extraction observes turns in conversation order.
    async fn append_message(&self, session_id: &str, message: &MemoryMessage)
        -> anyhow::Result<()>;

    /// Run a scoped search over the user's graph.
    async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse>;
}
