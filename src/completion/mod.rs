//! Answer-generation port.
//!
//! Grading a memory system requires an LLM to turn retrieved context into an
//! answer. [`CompletionService`] is that seam; the OpenAI-compatible REST
//! implementation lives in [`openai`].

pub mod openai;

use async_trait::async_trait;

pub use openai::OpenAiCompletion;

/// Chat-completion backend used for the response stage.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Run a single-turn completion and return the assistant text.
    ///
    /// A response with no content maps to an empty string rather than an
    /// error so one refusal cannot abort a whole benchmark run.
    async fn complete(
        &self,
        system_prompt: Option<&str>,
        prompt: &str,
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String>;
}
