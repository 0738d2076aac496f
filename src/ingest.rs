//! Conversation ingestion into the memory service.
//!
//! Each group becomes one benchmark user with one session. Turns are
//! submitted one message at a time, in conversation order, so the graph
//! extractor observes the dialogue the way it originally unfolded. Every
//! message in a session carries that session's date anchor as its timestamp.

use anyhow::Context;
use tracing::{debug, info};

use crate::dataset::ConversationGroup;
use crate::error::Result;
use crate::memory::{MemoryMessage, MemoryService, SpeakerRole};

/// Ingest one conversation group. Returns the number of messages submitted.
///
/// Registration conflicts are tolerated so re-runs against a warm service
/// work; a failed message append aborts the whole group, since a graph built
/// from a partial conversation would corrupt every later measurement.
pub async fn ingest_group(
    memory: &dyn MemoryService,
    group: &ConversationGroup,
) -> Result<usize> {
    let user_id = group.user_id();
    let session_id = group.session_id();

    if let Err(err) = register(memory, &user_id, &group.speaker_a, &session_id).await {
        debug!(user_id = %user_id, "registration tolerated: {err:#}");
    }

    let mut submitted = 0usize;
    for session in &group.sessions {
        let created_at = session.anchor_utc()?;
        debug!(
            session_id = %session_id,
            session_index = session.index,
            turns = session.turns.len(),
            "ingesting session"
        );

        for turn in &session.turns {
            let message = MemoryMessage {
                role: turn.speaker.clone(),
                role_type: SpeakerRole::classify(&turn.speaker, &group.speaker_a),
                content: turn.text.clone(),
                created_at,
            };
            memory
                .append_message(&session_id, &message)
                .await
                .with_context(|| {
                    format!(
                        "failed to ingest turn in session_{} of {user_id}",
                        session.index
                    )
                })?;
            submitted += 1;
        }
    }

    info!(user_id = %user_id, messages = submitted, "group ingested");
    Ok(submitted)
}

async fn register(
    memory: &dyn MemoryService,
    user_id: &str,
    first_name: &str,
    session_id: &str,
) -> anyhow::Result<()> {
    memory.register_user(user_id, first_name).await?;
    memory.create_session(session_id, user_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{ConversationSession, DialogTurn};
    use crate::memory::{SearchRequest, SearchResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMemory {
        appended: Mutex<Vec<(String, MemoryMessage)>>,
        fail_registration: bool,
        fail_append_after: Option<usize>,
    }

    #[async_trait]
    impl MemoryService for RecordingMemory {
        async fn register_user(&self, _user_id: &str, _first_name: &str) -> anyhow::Result<()> {
            if self.fail_registration {
                anyhow::bail!("user already exists");
            }
            Ok(())
        }

        async fn create_session(&self, _session_id: &str, _user_id: &str) -> anyhow::Result<()> {
            Ok(())
        }

        async fn append_message(
            &self,
            session_id: &str,
            message: &MemoryMessage,
        ) -> anyhow::Result<()> {
            let mut appended = self.appended.lock().unwrap();
            if let Some(limit) = self.fail_append_after {
                if appended.len() >= limit {
                    anyhow::bail!("service unavailable");
                }
            }
            appended.push((session_id.to_string(), message.clone()));
            Ok(())
        }

        async fn search(&self, _request: &SearchRequest) -> anyhow::Result<SearchResponse> {
            Ok(SearchResponse::default())
        }
    }

    fn turn(speaker: &str, text: &str) -> DialogTurn {
        DialogTurn {
            speaker: speaker.to_string(),
            text: text.to_string(),
            dia_id: None,
            blip_caption: None,
        }
    }

    fn group() -> ConversationGroup {
        ConversationGroup {
            index: 3,
            sample_id: None,
            speaker_a: "Caroline".into(),
            speaker_b: "Melanie".into(),
            sessions: vec![
                ConversationSession {
                    index: 0,
                    anchor: "1:56 pm on 8 May, 2023".into(),
                    turns: vec![turn("Caroline", "I adopted a dog!"), turn("Melanie", "Nice!")],
                },
                ConversationSession {
                    index: 4,
                    anchor: "10:00 am on 15 June, 2023".into(),
                    turns: vec![turn("Melanie", "How is the dog?")],
                },
            ],
            qa: vec![],
        }
    }

    #[tokio::test]
    async fn submits_turns_in_order_with_session_anchors() {
        let memory = RecordingMemory::default();
        let submitted = ingest_group(&memory, &group()).await.unwrap();
        assert_eq!(submitted, 3);

        let appended = memory.appended.lock().unwrap();
        assert_eq!(appended.len(), 3);
        assert!(appended.iter().all(|(sid, _)| sid == "locomo_session_3"));

        let first = &appended[0].1;
        assert_eq!(first.role, "Caroline");
        assert_eq!(first.role_type, SpeakerRole::User);
        assert_eq!(first.created_at.to_rfc3339(), "2023-05-08T13:56:00+00:00");

        let second = &appended[1].1;
        assert_eq!(second.role, "Melanie");
        assert_eq!(second.role_type, SpeakerRole::Peer);
        assert_eq!(second.created_at, first.created_at);

        let third = &appended[2].1;
        assert_eq!(third.created_at.to_rfc3339(), "2023-06-15T10:00:00+00:00");
    }

    #[tokio::test]
    async fn registration_conflict_is_tolerated() {
        let memory = RecordingMemory { fail_registration: true, ..Default::default() };
        let submitted = ingest_group(&memory, &group()).await.unwrap();
        assert_eq!(submitted, 3);
    }

    #[tokio::test]
    async fn append_failure_aborts_the_group() {
        let memory = RecordingMemory { fail_append_after: Some(1), ..Default::default() };
        let err = ingest_group(&memory, &group()).await.unwrap_err();
        assert!(err.to_string().contains("failed to ingest turn"));
        assert_eq!(memory.appended.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bad_anchor_surfaces_as_dataset_error() {
        let mut g = group();
        g.sessions[0].anchor = "last spring".into();
        let err = ingest_group(&RecordingMemory::default(), &g).await.unwrap_err();
        assert!(matches!(err, crate::error::BenchError::Dataset(_)));
    }
}
