//! Reference corpus loading.
//!
//! A corpus file is plain UTF-8 text; blank lines (`"\n\n"`) separate documents.
//! Each trimmed, non-empty segment becomes one [`Document`], numbered in file order.

mod error;


pub use error::CorpusError;

use std::io;
use std::path::Path;

use tracing::info;

const DOCUMENT_SEPARATOR: &str = "\n\n";

/// One paragraph of the reference corpus. Identity is `index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub index: usize,
    pub text: String,
}

impl Document {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Identifier reported on matches (`corpus_doc_{index}`).
    pub fn source_id(&self) -> String {
        source_id(self.index)
    }
}

/// Formats the match source identifier for a document index.
#[inline]
pub fn source_id(index: usize) -> String {
    format!("corpus_doc_{index}")
}

/// Splits raw corpus text into documents.
pub fn split_documents(content: &str) -> Vec<Document> {
    content
        .split(DOCUMENT_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .map(|(index, segment)| Document::new(index, segment))
        .collect()
}

/// Reads and splits a corpus file. Zero documents is an error.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<Document>, CorpusError> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CorpusError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            CorpusError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let documents = split_documents(&content);
    if documents.is_empty() {
        return Err(CorpusError::Empty {
            path: path.to_path_buf(),
        });
    }

    info!(
        path = %path.display(),
        documents = documents.len(),
        "Loaded corpus"
    );

    Ok(documents)
}
