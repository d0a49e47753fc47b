//! Sentence embeddings and vector similarity.
//!
//! - [`encoder`] turns text into L2-normalized vectors (BERT or deterministic stub).
//! - [`cosine_similarity`] is shared by the web comparison path.

/// BERT wrapper with mean pooling.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Sentence embedder.
pub mod encoder;
mod error;
/// Tokenizer loading helpers.
pub mod utils;

pub use encoder::{EncoderConfig, SentenceEmbedder};
pub use error::EmbeddingError;

/// Cosine of the angle between `a` and `b`.
///
/// Returns `0.0` when either vector has zero norm or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
