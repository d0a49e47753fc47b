use thiserror::Error;

/// Failures surfaced by [`PlagiarismService`](super::PlagiarismService).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Corpus file missing, unreadable, or empty at construction.
    #[error("corpus unavailable: {reason}")]
    CorpusUnavailable { reason: String },

    /// Query text contained no non-blank sentence.
    #[error("input text is too short or invalid")]
    EmptyInput,

    /// Signature or embedding build failed; no index was kept.
    #[error("index build failed: {reason}")]
    IndexBuildFailure { reason: String },

    /// Service was constructed without usable indices.
    #[error("plagiarism service not ready: {reason}")]
    NotReady { reason: String },

    /// A per-request embedding or search failure.
    #[error("query failed: {reason}")]
    Query { reason: String },
}

impl ServiceError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::CorpusUnavailable { .. } => "corpus_unavailable",
            ServiceError::EmptyInput => "empty_input",
            ServiceError::IndexBuildFailure { .. } => "index_build_failure",
            ServiceError::NotReady { .. } => "not_ready",
            ServiceError::Query { .. } => "query_failed",
        }
    }
}
