//! Evidence records produced by both retrieval channels.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Which channel produced a [`Match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// MinHash/LSH estimate or verbatim containment.
    Lexical,
    /// Embedding nearest neighbour.
    Semantic,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Lexical => "lexical",
            MatchType::Semantic => "semantic",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One query sentence paired with one corpus document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Sentence from the submitted text.
    pub query_text: String,
    /// Full text of the matched corpus document.
    pub matched_text: String,
    /// Similarity on a 0–100 scale, rounded to two decimals.
    pub similarity_score: f64,
    pub match_type: MatchType,
    pub source_id: Option<String>,
}

impl Match {
    pub fn lexical(
        query_text: impl Into<String>,
        matched_text: impl Into<String>,
        similarity_score: f64,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            query_text: query_text.into(),
            matched_text: matched_text.into(),
            similarity_score,
            match_type: MatchType::Lexical,
            source_id: Some(source_id.into()),
        }
    }

    pub fn semantic(
        query_text: impl Into<String>,
        matched_text: impl Into<String>,
        similarity_score: f64,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            query_text: query_text.into(),
            matched_text: matched_text.into(),
            similarity_score,
            match_type: MatchType::Semantic,
            source_id: Some(source_id.into()),
        }
    }

    /// Score normalized to `[0, 1]`.
    #[inline]
    pub fn normalized(&self) -> f64 {
        self.similarity_score / 100.0
    }
}

/// Stable sort by score, highest first. Equal scores keep their input order.
pub fn sort_by_score_desc(matches: &mut [Match]) {
    matches.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(Ordering::Equal)
    });
}

/// Sorts (stable, descending) and keeps the best `k`.
pub fn top_k(mut matches: Vec<Match>, k: usize) -> Vec<Match> {
    sort_by_score_desc(&mut matches);
    matches.truncate(k);
    matches
}
