//! Cross-cutting, shared constants.
//!
//! Engine defaults live here so the config layer, the indices and the tests agree on
//! one set of values. Runtime overrides always flow through
//! [`EngineConfig`](crate::config::EngineConfig); nothing in the core reads these directly
//! once a config value has been built.

/// MinHash permutation count (signature length).
pub const DEFAULT_PERMUTATIONS: usize = 128;

/// Jaccard threshold used for LSH banding and candidate filtering.
pub const DEFAULT_LSH_THRESHOLD: f64 = 0.5;

/// Seed for the MinHash permutation family. Fixed so builds are reproducible.
pub const MINHASH_SEED: u64 = 1;

/// Number of nearest neighbours retrieved per query sentence (semantic channel).
pub const DEFAULT_K_SEMANTIC: usize = 5;

/// Number of lexical matches kept across all query sentences.
pub const DEFAULT_K_LEXICAL: usize = 5;

/// Weight applied to the lexical channel in the informational breakdown.
pub const DEFAULT_WEIGHT_LEXICAL: f64 = 0.6;

/// Weight applied to the semantic channel in the informational breakdown.
pub const DEFAULT_WEIGHT_SEMANTIC: f64 = 0.4;

/// Sentence-embedding model identifier.
pub const DEFAULT_EMBEDDING_MODEL_ID: &str = "all-MiniLM-L6-v2";

/// Output dimension of the default embedding model.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Max tokens fed to the encoder per text.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Matches considered per channel when fusing scores.
pub const FUSION_TOP_N: usize = 5;

/// Below this raw score the fused result is compressed toward zero.
pub const CALIBRATION_KNEE: f64 = 0.5;

/// Compression factor applied below [`CALIBRATION_KNEE`].
pub const WEAK_SIGNAL_FACTOR: f64 = 0.2;

/// Score reported for a verbatim (substring) lexical hit.
pub const VERBATIM_SCORE: f64 = 100.0;

/// Default corpus location, relative to the working directory.
pub const DEFAULT_CORPUS_PATH: &str = "./corpus/fixed_corpus.txt";

/// Organic results requested from the SERP provider.
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 5;

/// Paragraph chunks embedded per fetched page.
pub const DEFAULT_MAX_CHUNKS_PER_PAGE: usize = 10;

/// Web matches returned when the caller does not ask for a count.
pub const DEFAULT_WEB_TOP_K: usize = 3;

/// Minimum trimmed length accepted for a web comparison.
pub const MIN_WEB_COMPARE_CHARS: usize = 20;

/// SERP cache bounds.
pub const SEARCH_CACHE_CAPACITY: u64 = 100;
pub const SEARCH_CACHE_TTL_SECS: u64 = 300;

/// Page-text cache bounds.
pub const PAGE_CACHE_CAPACITY: u64 = 50;
pub const PAGE_CACHE_TTL_SECS: u64 = 3600;

/// Per-request timeout for outbound HTTP calls.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Page bodies are cut at this many bytes before HTML parsing.
pub const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// Snippets longer than this are truncated.
pub const SNIPPET_MAX_CHARS: usize = 250;

/// Kept prefix length when a snippet is truncated (an ellipsis is appended).
pub const SNIPPET_TRUNCATE_CHARS: usize = 247;

/// Rounds to `places` decimal places (half away from zero).
#[inline]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
