//! Question answering over retrieved context.
//!
//! The prompt is part of the benchmark contract: it instructs the model to
//! resolve relative time references against message timestamps, which is
//! exactly the capability a temporal memory graph is supposed to enable.

use std::time::Instant;

use tracing::debug;

use crate::artifacts::ResponseRecord;
use crate::completion::CompletionService;
use crate::dataset::QaItem;

/// System prompt for the answering model.
pub const ANSWER_SYSTEM_PROMPT: &str = "You are a helpful expert assistant answering questions from lme_experiment users based on the provided context.";

/// Deterministic decoding so repeated runs produce comparable answers.
pub const ANSWER_TEMPERATURE: f64 = 0.0;

/// Build the user prompt for one question over its retrieved context.
pub fn build_answer_prompt(context: &str, question: &str) -> String {
    format!(
        "\
# CONTEXT:
You have access to facts and entities from a conversation.

# INSTRUCTIONS:
1. Carefully analyze all provided memories
2. Pay special attention to the timestamps to determine the answer
3. If the question asks about a specific event or fact, look for direct evidence in the memories
4. If the memories contain contradictory information, prioritize the most recent memory
5. Always convert relative time references to specific dates, months, or years.
6. Be as specific as possible when talking about people, places, and events
7. Timestamps in memories represent the actual time the event occurred, not the time the event was mentioned in a message.

Clarification:
When interpreting memories, use the timestamp to determine when the described event happened, not when someone talked about the event.

Example:

Memory: (2023-03-15T16:33:00Z) I went to the vet yesterday.
Question: What day did I go to the vet?
Correct Answer: March 15, 2023
Explanation:
Even though the phrase says \"yesterday,\" the timestamp shows the event was recorded as happening on March 15th. Therefore, the actual vet visit happened on that date, regardless of the word \"yesterday\" in the text.

# APPROACH (Think step by step):
1. First, examine all memories that contain information related to the question
2. Examine the timestamps and content of these memories carefully
3. Look for explicit mentions of dates, times, locations, or events that answer the question
4. If the answer requires calculation (e.g., converting relative time references), show your work
5. Formulate a precise, concise answer based solely on the evidence in the memories
6. Double-check that your answer directly addresses the question asked
7. Ensure your final answer is specific and avoids vague time references

Context:

{context}

Question: {question}
Answer:"
    )
}

/// Answer one QA item against its retrieved context.
///
/// Items without any gold answer are skipped with `None`; they carry nothing
/// to score against. The reported latency covers prompt assembly plus the
/// completion call.
pub async fn answer_question(
    completion: &dyn CompletionService,
    qa: &QaItem,
    context: &str,
    model: &str,
) -> anyhow::Result<Option<ResponseRecord>> {
    let Some(golden_answer) = qa.gold_answer() else {
        debug!(question = %qa.question, "skipping item without a gold answer");
        return Ok(None);
    };

    let start = Instant::now();
    let prompt = build_answer_prompt(context, &qa.question);
    let answer = completion
        .complete(Some(ANSWER_SYSTEM_PROMPT), &prompt, model, ANSWER_TEMPERATURE)
        .await?;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    Ok(Some(ResponseRecord {
        question: qa.question.clone(),
        answer,
        golden_answer,
        duration_ms,
    }))
}
