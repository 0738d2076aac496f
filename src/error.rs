use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for the benchmark harness.
///
/// The typed variants cover the failures a caller must be able to tell apart
/// (a misaligned artifact must never be scored as a truncated one); internal
/// code continues to use `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum BenchError {
    // ── Dataset ─────────────────────────────────────────────────────────
    #[error("dataset: {0}")]
    Dataset(#[from] DatasetError),

    // ── Question/result pairing ─────────────────────────────────────────
    #[error("pairing: {0}")]
    Pairing(#[from] PairingError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Dataset errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("group {group_index} has no conversation object")]
    MissingConversation { group_index: usize },

    #[error("group {group_index} session {session_index} has no date/time anchor")]
    MissingAnchor {
        group_index: usize,
        session_index: usize,
    },

    #[error("unparseable session anchor {anchor:?}: {source}")]
    InvalidAnchor {
        anchor: String,
        #[source]
        source: chrono::ParseError,
    },
}

// ─── Pairing errors ──────────────────────────────────────────────────────────

/// Violations of the strict question↔result alignment invariant.
///
/// These are hard failures: silently truncating or zipping misaligned
/// sequences would corrupt every downstream score.
#[derive(Debug, Error)]
pub enum PairingError {
    #[error(
        "group {group_id}: {questions} answerable questions but {results} search results"
    )]
    CountMismatch {
        group_id: String,
        questions: usize,
        results: usize,
    },

    #[error("no search results recorded for group {group_id}")]
    MissingGroup { group_id: String },
}

// ─── Convenience re-exports ──────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, BenchError>;
