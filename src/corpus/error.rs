use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read corpus {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus {path} contains no documents")]
    Empty { path: PathBuf },
}
