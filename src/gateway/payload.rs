use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_WEB_TOP_K;
use crate::matches::Match;
use crate::service::Verdict;

pub const CHECK_COMPLETE_MESSAGE: &str = "Plagiarism check complete.";

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CheckRequest {
    pub text_to_check: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CheckResponse {
    pub overall_similarity: f64,
    pub lexical_breakdown: f64,
    pub semantic_breakdown: f64,
    pub processing_time_s: f64,
    pub message: String,
    pub matches: Vec<Match>,
}

impl From<Verdict> for CheckResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            overall_similarity: verdict.overall_similarity,
            lexical_breakdown: verdict.lexical_breakdown,
            semantic_breakdown: verdict.semantic_breakdown,
            processing_time_s: verdict.processing_time_s,
            message: CHECK_COMPLETE_MESSAGE.to_string(),
            matches: verdict.matches,
        }
    }
}

fn default_top_k() -> usize {
    DEFAULT_WEB_TOP_K
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WebCompareRequest {
    pub text: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}
