use serde::{Deserialize, Serialize};

use crate::matches::Match;

/// Outcome of one plagiarism check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Calibrated overall similarity, 0-100.
    pub overall_similarity: f64,
    pub lexical_breakdown: f64,
    pub semantic_breakdown: f64,
    /// Wall time of the check in seconds, three decimals.
    pub processing_time_s: f64,
    /// Both channels, highest score first.
    pub matches: Vec<Match>,
    pub lexical_matches: Vec<Match>,
    pub semantic_matches: Vec<Match>,
}

impl Verdict {
    /// Equality ignoring `processing_time_s`.
    pub fn same_result(&self, other: &Verdict) -> bool {
        self.overall_similarity == other.overall_similarity
            && self.lexical_breakdown == other.lexical_breakdown
            && self.semantic_breakdown == other.semantic_breakdown
            && self.matches == other.matches
            && self.lexical_matches == other.lexical_matches
            && self.semantic_matches == other.semantic_matches
    }
}
