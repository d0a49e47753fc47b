use thiserror::Error;

/// Failures inside the web comparison path. Callers never see these; they are
/// logged and turned into empty results.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to extract page text: {reason}")]
    Extract { reason: String },

    #[error("embedding failed: {reason}")]
    Embedding { reason: String },
}

pub type WebResult<T> = Result<T, WebError>;
