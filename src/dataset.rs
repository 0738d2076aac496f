//! LoCoMo benchmark dataset loading.
//!
//! Parses the snap-research LoCoMo JSON document: a top-level array of
//! conversation groups, each carrying a `conversation` object with
//! `speaker_a`/`speaker_b` and dynamic per-session keys (`session_0`,
//! `session_0_date_time`, ...) plus a `qa` annotation list. Session indices
//! are sparse, so parsing scans the full index range instead of stopping at
//! the first gap.

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Upper bound on per-group session indices scanned during parsing.
pub const MAX_SESSIONS_PER_GROUP: usize = 35;

/// Format of the per-session date/time anchor, e.g. `1:56 pm on 8 May, 2023`.
/// Anchors carry no zone designator and are treated as UTC.
const ANCHOR_FORMAT: &str = "%I:%M %p on %d %B, %Y";

// ---------------------------------------------------------------------------
// Raw data types (matching the snap-research/locomo JSON schema)
// ---------------------------------------------------------------------------

/// A single dialogue turn within a conversation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogTurn {
    /// Speaker name (matches `speaker_a` or `speaker_b`).
    pub speaker: String,
    /// The dialogue text content.
    pub text: String,
    /// Dialogue identifier (e.g. "D1:3" = session 1, turn 3).
    #[serde(default)]
    pub dia_id: Option<String>,
    /// BLIP-generated caption for turns that shared an image.
    #[serde(default)]
    pub blip_caption: Option<String>,
}

/// A single QA annotation.
///
/// Category 5 (adversarial) items often carry only `adversarial_answer`;
/// a handful of entries in the wild carry neither answer, and those are
/// excluded from evaluation entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaItem {
    /// The question text.
    pub question: String,
    /// Ground-truth answer, when present.
    #[serde(default)]
    pub answer: Option<serde_json::Value>,
    /// Alternate gold answer for adversarial items.
    #[serde(default)]
    pub adversarial_answer: Option<String>,
    /// QA category (1=single-hop, 2=temporal, 3=open-domain, 4=multi-hop,
    /// 5=adversarial).
    #[serde(default)]
    pub category: Option<u8>,
    /// Dialogue IDs containing the answer evidence. Kept verbatim for
    /// downstream scorers; shapes vary across dataset variants.
    #[serde(default)]
    pub evidence: Vec<serde_json::Value>,
}

impl QaItem {
    /// The gold answer used for scoring: the primary answer when present,
    /// otherwise the adversarial one.
    pub fn gold_answer(&self) -> Option<String> {
        match &self.answer {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => {
                self.adversarial_answer.clone()
            }
            // Numeric and other scalar answers appear in the wild ("4", 2022).
            Some(other) => Some(other.to_string()),
        }
    }

    /// Whether this item participates in evaluation at all.
    pub fn is_answerable(&self) -> bool {
        self.gold_answer().is_some()
    }
}

/// One conversation session: an ordered list of turns plus its date anchor.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    /// Session index as it appears in the source keys (sparse).
    pub index: usize,
    /// Raw date/time anchor string, e.g. "1:56 pm on 8 May, 2023".
    pub anchor: String,
    /// Dialogue turns in original order.
    pub turns: Vec<DialogTurn>,
}

impl ConversationSession {
    /// Parse the session anchor and pin it to UTC.
    ///
    /// Every message in the session is stamped with this instant; in-session
    /// ordering is conveyed by submission order, not by the timestamp.
    pub fn anchor_utc(&self) -> Result<DateTime<Utc>, DatasetError> {
        let naive = NaiveDateTime::parse_from_str(&self.anchor, ANCHOR_FORMAT)
            .map_err(|source| DatasetError::InvalidAnchor {
                anchor: self.anchor.clone(),
                source,
            })?;
        Ok(naive.and_utc())
    }
}

/// One benchmark subject: a multi-session conversation plus its QA set.
#[derive(Debug, Clone)]
pub struct ConversationGroup {
    /// Position in the dataset file; identities derive from it.
    pub index: usize,
    /// Sample identifier from the source document, when present.
    pub sample_id: Option<String>,
    /// Name of the primary speaker.
    pub speaker_a: String,
    /// Name of the second speaker.
    pub speaker_b: String,
    /// Sessions present in the source, in index order.
    pub sessions: Vec<ConversationSession>,
    /// QA annotations in original order.
    pub qa: Vec<QaItem>,
}

impl ConversationGroup {
    /// Stable user identity for this group, derived from file position.
    pub fn user_id(&self) -> String {
        format!("locomo_user_{}", self.index)
    }

    /// Stable session identity for this group, derived from file position.
    pub fn session_id(&self) -> String {
        format!("locomo_session_{}", self.index)
    }

    /// QA items that participate in evaluation, in original order.
    ///
    /// Both the search and the answering stage enumerate exactly this
    /// sequence, which is what keeps their artifacts position-aligned.
    pub fn answerable_qa(&self) -> Vec<&QaItem> {
        self.qa.iter().filter(|qa| qa.is_answerable()).collect()
    }
}

/// The complete benchmark document.
#[derive(Debug, Clone)]
pub struct LocomoDataset {
    pub groups: Vec<ConversationGroup>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl LocomoDataset {
    /// Load the benchmark document from a local JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("failed to read dataset file: {}", path.as_ref().display())
        })?;
        Self::from_json_str(&content)
    }

    /// Parse the benchmark document from a JSON string.
    ///
    /// Accepts the canonical array form; a single group object is also
    /// accepted for fixture convenience.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).context("failed to parse dataset JSON")?;

        let group_values = match value {
            serde_json::Value::Array(arr) => arr,
            obj @ serde_json::Value::Object(_) => vec![obj],
            _ => anyhow::bail!("dataset JSON must be an array of groups"),
        };

        let mut groups = Vec::with_capacity(group_values.len());
        for (index, gv) in group_values.iter().enumerate() {
            groups.push(parse_group(gv, index)?);
        }

        Ok(LocomoDataset { groups })
    }
}

/// Parse one conversation group.
///
/// The `conversation` object uses dynamic keys, so it is walked manually.
/// Absent session indices are skipped rather than treated as the end: the
/// source data leaves gaps.
fn parse_group(
    value: &serde_json::Value,
    index: usize,
) -> anyhow::Result<ConversationGroup> {
    let obj = value
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("group {index} must be a JSON object"))?;

    let sample_id = obj.get("sample_id").map(|v| match v.as_str() {
        Some(s) => s.to_string(),
        None => v.to_string(),
    });

    let conversation = obj
        .get("conversation")
        .and_then(|v| v.as_object())
        .ok_or(DatasetError::MissingConversation { group_index: index })?;

    let speaker_a = conversation
        .get("speaker_a")
        .and_then(|v| v.as_str())
        .unwrap_or("speaker_a")
        .to_string();
    let speaker_b = conversation
        .get("speaker_b")
        .and_then(|v| v.as_str())
        .unwrap_or("speaker_b")
        .to_string();

    let mut sessions = Vec::new();
    for session_index in 0..MAX_SESSIONS_PER_GROUP {
        let session_key = format!("session_{session_index}");
        let Some(turns_value) = conversation.get(&session_key) else {
            continue;
        };

        let anchor = conversation
            .get(&format!("session_{session_index}_date_time"))
            .and_then(|v| v.as_str())
            .ok_or(DatasetError::MissingAnchor {
                group_index: index,
                session_index,
            })?
            .to_string();

        let turns: Vec<DialogTurn> = serde_json::from_value(turns_value.clone())
            .with_context(|| {
                format!("failed to parse turns in group {index} {session_key}")
            })?;

        sessions.push(ConversationSession {
            index: session_index,
            anchor,
            turns,
        });
    }

    let qa: Vec<QaItem> = obj
        .get("qa")
        .map(|v| serde_json::from_value(v.clone()))
        .transpose()
        .with_context(|| format!("failed to parse qa list for group {index}"))?
        .unwrap_or_default();

    Ok(ConversationGroup {
        index,
        sample_id,
        speaker_a,
        speaker_b,
        sessions,
        qa,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn make_turn(speaker: &str, text: &str) -> DialogTurn {
        DialogTurn {
            speaker: speaker.to_string(),
            text: text.to_string(),
            dia_id: None,
            blip_caption: None,
        }
    }

    fn make_session(index: usize, anchor: &str, turns: Vec<DialogTurn>) -> ConversationSession {
        ConversationSession {
            index,
            anchor: anchor.to_string(),
            turns,
        }
    }

    #[test]
    fn parses_array_of_groups() {
        let json = r#"[
            {
                "sample_id": "conv-26",
                "conversation": {
                    "speaker_a": "Alice",
                    "speaker_b": "Bob",
                    "session_0_date_time": "1:56 pm on 8 May, 2023",
                    "session_0": [
                        {"speaker": "Alice", "dia_id": "D1:1", "text": "Hello"}
                    ]
                },
                "qa": [
                    {"question": "Who said hello?", "answer": "Alice", "evidence": ["D1:1"], "category": 1}
                ]
            }
        ]"#;

        let ds = LocomoDataset::from_json_str(json).unwrap();
        assert_eq!(ds.groups.len(), 1);
        let group = &ds.groups[0];
        assert_eq!(group.sample_id.as_deref(), Some("conv-26"));
        assert_eq!(group.speaker_a, "Alice");
        assert_eq!(group.sessions.len(), 1);
        assert_eq!(group.sessions[0].turns.len(), 1);
        assert_eq!(group.qa.len(), 1);
        assert_eq!(group.qa[0].gold_answer().as_deref(), Some("Alice"));
    }

    #[test]
    fn sparse_session_indices_are_kept_in_order() {
        let json = r#"[{
            "conversation": {
                "speaker_a": "A",
                "speaker_b": "B",
                "session_1_date_time": "1:00 pm on 1 January, 2024",
                "session_1": [{"speaker": "A", "text": "one"}],
                "session_4_date_time": "2:00 pm on 2 January, 2024",
                "session_4": [{"speaker": "B", "text": "four"}],
                "session_9_date_time": "3:00 pm on 3 January, 2024",
                "session_9": [{"speaker": "A", "text": "nine"}]
            },
            "qa": []
        }]"#;

        let ds = LocomoDataset::from_json_str(json).unwrap();
        let indices: Vec<usize> =
            ds.groups[0].sessions.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 4, 9]);
        assert_eq!(ds.groups[0].sessions[1].turns[0].text, "four");
    }

    #[test]
    fn missing_conversation_is_an_error() {
        let json = r#"[{"qa": []}]"#;
        let err = LocomoDataset::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("conversation"));
    }

    #[test]
    fn session_without_anchor_is_an_error() {
        let json = r#"[{
            "conversation": {
                "speaker_a": "A",
                "speaker_b": "B",
                "session_0": [{"speaker": "A", "text": "hi"}]
            },
            "qa": []
        }]"#;
        assert!(LocomoDataset::from_json_str(json).is_err());
    }

    #[test]
    fn anchor_parses_as_utc() {
        let session =
            make_session(0, "1:56 pm on 8 May, 2023", vec![make_turn("A", "hi")]);
        let ts = session.anchor_utc().unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-05-08T13:56:00+00:00");
        assert_eq!(ts.hour(), 13);
    }

    #[test]
    fn morning_anchor_parses_as_am() {
        let session =
            make_session(2, "10:00 am on 15 June, 2023", vec![make_turn("A", "hi")]);
        let ts = session.anchor_utc().unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-06-15T10:00:00+00:00");
    }

    #[test]
    fn garbled_anchor_is_a_typed_error() {
        let session = make_session(0, "sometime in spring", vec![]);
        let err = session.anchor_utc().unwrap_err();
        assert!(matches!(err, DatasetError::InvalidAnchor { .. }));
    }

    #[test]
    fn gold_answer_prefers_primary_over_adversarial() {
        let qa = QaItem {
            question: "q".into(),
            answer: Some(serde_json::Value::String("primary".into())),
            adversarial_answer: Some("adversarial".into()),
            category: Some(5),
            evidence: vec![],
        };
        assert_eq!(qa.gold_answer().as_deref(), Some("primary"));
    }

    #[test]
    fn gold_answer_falls_back_to_adversarial() {
        let qa = QaItem {
            question: "q".into(),
            answer: None,
            adversarial_answer: Some("not mentioned".into()),
            category: Some(5),
            evidence: vec![],
        };
        assert_eq!(qa.gold_answer().as_deref(), Some("not mentioned"));
        assert!(qa.is_answerable());
    }

    #[test]
    fn numeric_answers_are_stringified() {
        let json = r#"[{
            "conversation": {"speaker_a": "A", "speaker_b": "B"},
            "qa": [{"question": "How many?", "answer": 4, "category": 1}]
        }]"#;
        let ds = LocomoDataset::from_json_str(json).unwrap();
        assert_eq!(ds.groups[0].qa[0].gold_answer().as_deref(), Some("4"));
    }

    #[test]
    fn answerable_qa_excludes_goldless_items() {
        let group = ConversationGroup {
            index: 0,
            sample_id: None,
            speaker_a: "A".into(),
            speaker_b: "B".into(),
            sessions: vec![],
            qa: vec![
                QaItem {
                    question: "answered".into(),
                    answer: Some(serde_json::Value::String("yes".into())),
                    adversarial_answer: None,
                    category: Some(1),
                    evidence: vec![],
                },
                QaItem {
                    question: "goldless".into(),
                    answer: None,
                    adversarial_answer: None,
                    category: Some(3),
                    evidence: vec![],
                },
                QaItem {
                    question: "adversarial only".into(),
                    answer: None,
                    adversarial_answer: Some("no evidence".into()),
                    category: Some(5),
                    evidence: vec![],
                },
            ],
        };

        let answerable = group.answerable_qa();
        assert_eq!(answerable.len(), 2);
        assert_eq!(answerable[0].question, "answered");
        assert_eq!(answerable[1].question, "adversarial only");
    }

    #[test]
    fn identities_derive_from_file_position() {
        let json = r#"[
            {"conversation": {"speaker_a": "A", "speaker_b": "B"}, "qa": []},
            {"conversation": {"speaker_a": "C", "speaker_b": "D"}, "qa": []}
        ]"#;
        let ds = LocomoDataset::from_json_str(json).unwrap();
        assert_eq!(ds.groups[0].user_id(), "locomo_user_0");
        assert_eq!(ds.groups[1].user_id(), "locomo_user_1");
        assert_eq!(ds.groups[1].session_id(), "locomo_session_1");
    }

    #[test]
    fn from_file_reads_what_was_written() {
        let json = r#"[{
            "conversation": {
                "speaker_a": "Alice",
                "speaker_b": "Bob",
                "session_0_date_time": "9:15 am on 2 March, 2023",
                "session_0": [{"speaker": "Bob", "text": "morning"}]
            },
            "qa": [{"question": "q", "answer": "a", "category": 2}]
        }]"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locomo.json");
        std::fs::write(&path, json).unwrap();

        let ds = LocomoDataset::from_file(&path).unwrap();
        assert_eq!(ds.groups.len(), 1);
        assert_eq!(ds.groups[0].sessions[0].anchor, "9:15 am on 2 March, 2023");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LocomoDataset::from_file("/no/such/locomo.json").unwrap_err();
        assert!(err.to_string().contains("/no/such/locomo.json"));
    }
}
