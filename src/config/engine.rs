use std::path::Path;

use crate::constants::{
    DEFAULT_EMBEDDING_MODEL_ID, DEFAULT_K_LEXICAL, DEFAULT_K_SEMANTIC, DEFAULT_LSH_THRESHOLD,
    DEFAULT_PERMUTATIONS, DEFAULT_WEIGHT_LEXICAL, DEFAULT_WEIGHT_SEMANTIC,
};

use super::error::ConfigError;

/// Scoring-engine parameters.
///
/// Passed explicitly into [`PlagiarismService`](crate::service::PlagiarismService)
/// construction; the core never reads the environment itself.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// MinHash signature length. Default: `128`.
    pub permutations: usize,
    /// Jaccard threshold for LSH banding and candidate filtering. Default: `0.5`.
    pub lsh_threshold: f64,
    /// Nearest neighbours per query sentence, and matches kept overall. Default: `5`.
    pub k_semantic: usize,
    /// Lexical matches kept across all query sentences. Default: `5`.
    pub k_lexical: usize,
    /// Breakdown weight for the lexical channel. Default: `0.6`.
    pub weight_lexical: f64,
    /// Breakdown weight for the semantic channel. Default: `0.4`.
    pub weight_semantic: f64,
    /// Sentence-embedding model identifier.
    ///
    /// The weights actually loaded are decided by `COPYLESS_MODEL_PATH`; this id is
    /// logged at build and compared with the model directory name at startup.
    pub embedding_model_id: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            permutations: DEFAULT_PERMUTATIONS,
            lsh_threshold: DEFAULT_LSH_THRESHOLD,
            k_semantic: DEFAULT_K_SEMANTIC,
            k_lexical: DEFAULT_K_LEXICAL,
            weight_lexical: DEFAULT_WEIGHT_LEXICAL,
            weight_semantic: DEFAULT_WEIGHT_SEMANTIC,
            embedding_model_id: DEFAULT_EMBEDDING_MODEL_ID.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_permutations(mut self, permutations: usize) -> Self {
        self.permutations = permutations;
        self
    }

    pub fn with_lsh_threshold(mut self, threshold: f64) -> Self {
        self.lsh_threshold = threshold;
        self
    }

    pub fn with_k(mut self, k_lexical: usize, k_semantic: usize) -> Self {
        self.k_lexical = k_lexical;
        self.k_semantic = k_semantic;
        self
    }

    pub fn with_weights(mut self, weight_lexical: f64, weight_semantic: f64) -> Self {
        self.weight_lexical = weight_lexical;
        self.weight_semantic = weight_semantic;
        self
    }

    /// `true` when the last component of `model_dir` names this model id.
    ///
    /// Hub-style ids (`sentence-transformers/all-MiniLM-L6-v2`) compare by their
    /// final segment; case is ignored.
    pub fn model_id_matches(&self, model_dir: &Path) -> bool {
        let expected = self
            .embedding_model_id
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .trim();
        model_dir
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.eq_ignore_ascii_case(expected))
    }

    /// Checks ranges. Weights are not required to sum to anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.permutations == 0 {
            return Err(ConfigError::InvalidEngine {
                reason: "permutations must be greater than zero".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.lsh_threshold) {
            return Err(ConfigError::InvalidEngine {
                reason: format!(
                    "lsh_threshold must be between 0.0 and 1.0, got {}",
                    self.lsh_threshold
                ),
            });
        }

        if self.k_lexical == 0 || self.k_semantic == 0 {
            return Err(ConfigError::InvalidEngine {
                reason: "k_lexical and k_semantic must be at least 1".to_string(),
            });
        }

        for (name, weight) in [
            ("weight_lexical", self.weight_lexical),
            ("weight_semantic", self.weight_semantic),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidEngine {
                    reason: format!("{name} must be a non-negative number, got {weight}"),
                });
            }
        }

        if self.embedding_model_id.trim().is_empty() {
            return Err(ConfigError::InvalidEngine {
                reason: "embedding_model_id cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
