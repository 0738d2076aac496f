//! REST client for the temporal graph memory service.

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::http::{api_error, build_service_client};
use crate::memory::{MemoryMessage, MemoryService, SearchRequest, SearchResponse};

/// HTTP implementation of [`MemoryService`] against the graph memory API.
pub struct GraphMemoryClient {
    client: reqwest::Client,
    base_url: String,
    /// Pre-formatted `Bearer` value, absent for unauthenticated deployments.
    auth_header: Option<String>,
}

impl GraphMemoryClient {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: build_service_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header: api_key
                .filter(|k| !k.is_empty())
                .map(|k| format!("Bearer {k}")),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<reqwest::Response> {
        let mut request = self.client.post(self.endpoint(path)).json(body);
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("memory service request to /{path} failed"))?;

        if !response.status().is_success() {
            return Err(api_error("memory", response).await);
        }
        Ok(response)
    }
}

#[derive(Serialize)]
struct RegisterUserRequest<'a> {
    user_id: &'a str,
    first_name: &'a str,
}

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    session_id: &'a str,
    user_id: &'a str,
}

#[derive(Serialize)]
struct AppendMessagesRequest<'a> {
    messages: &'a [MemoryMessage],
}

#[async_trait]
impl MemoryService for GraphMemoryClient {
    async fn register_user(&self, user_id: &str, first_name: &str) -> anyhow::Result<()> {
        self.post_json("users", &RegisterUserRequest { user_id, first_name })
            .await?;
        Ok(())
    }

    async fn create_session(&self, session_id: &str, user_id: &str) -> anyhow::Result<()> {
        self.post_json("sessions", &CreateSessionRequest { session_id, user_id })
            .await?;
        Ok(())
    }

    async fn append_message(
        &self,
        session_id: &str,
        message: &MemoryMessage,
    ) -> anyhow::Result<()> {
        let path = format!("sessions/{session_id}/messages");
        self.post_json(
            &path,
            &AppendMessagesRequest {
                messages: std::slice::from_ref(message),
            },
        )
        .await?;
        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse> {
        debug!(
            scope = %request.scope,
            reranker = %request.reranker,
            limit = request.limit,
            "graph search"
        );
        let response = self.post_json("graph/search", request).await?;
        response
            .json::<SearchResponse>()
            .await
            .context("failed to decode memory search response")
    }
}
