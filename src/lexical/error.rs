use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexicalError {
    #[error("invalid lexical index configuration: {reason}")]
    InvalidConfig { reason: String },
}
