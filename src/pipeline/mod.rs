//! Per-request fan-out: sentence splitting, then both retrieval channels.


use tracing::debug;

use crate::lexical::LexicalIndex;
use crate::matches::{Match, sort_by_score_desc};
use crate::semantic::SemanticIndex;
use crate::service::ServiceError;

const SENTENCE_DELIMITER: char = '.';

/// Splits on `'.'`, trims, and drops empty fragments.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(SENTENCE_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Results of both channels for one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelMatches {
    pub sentences: Vec<String>,
    pub lexical: Vec<Match>,
    pub semantic: Vec<Match>,
}

impl ChannelMatches {
    /// Semantic then lexical, stable-sorted by score (highest first).
    pub fn combined(&self) -> Vec<Match> {
        let mut all: Vec<Match> = self
            .semantic
            .iter()
            .chain(self.lexical.iter())
            .cloned()
            .collect();
        sort_by_score_desc(&mut all);
        all
    }
}

/// Owns both indices and queries them independently.
#[derive(Debug)]
pub struct QueryPipeline {
    lexical: LexicalIndex,
    semantic: SemanticIndex,
}

impl QueryPipeline {
    pub fn new(lexical: LexicalIndex, semantic: SemanticIndex) -> Self {
        Self { lexical, semantic }
    }

    pub fn lexical(&self) -> &LexicalIndex {
        &self.lexical
    }

    pub fn semantic(&self) -> &SemanticIndex {
        &self.semantic
    }

    /// Splits `text` and searches both channels.
    ///
    /// Text with no non-blank sentence is [`ServiceError::EmptyInput`], not a zero score.
    pub fn run(&self, text: &str) -> Result<ChannelMatches, ServiceError> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Err(ServiceError::EmptyInput);
        }

        let semantic = self
            .semantic
            .search(&sentences)
            .map_err(|e| ServiceError::Query {
                reason: e.to_string(),
            })?;
        let lexical = self.lexical.search(&sentences);

        debug!(
            sentences = sentences.len(),
            lexical = lexical.len(),
            semantic = semantic.len(),
            "Query channels complete"
        );

        Ok(ChannelMatches {
            sentences,
            lexical,
            semantic,
        })
    }
}
