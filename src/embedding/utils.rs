//! Tokenizer loading for the sentence encoder.

use std::path::{Path, PathBuf};

use tokenizers::{Tokenizer, TruncationParams};

use super::error::EmbeddingError;

const TOKENIZER_FILE: &str = "tokenizer.json";

/// Resolves `tokenizer.json` from a model directory, the file itself, or a sibling path.
pub fn tokenizer_path(model_path: &Path) -> PathBuf {
    if model_path.file_name().is_some_and(|name| name == TOKENIZER_FILE) {
        model_path.to_path_buf()
    } else if model_path.is_dir() {
        model_path.join(TOKENIZER_FILE)
    } else {
        model_path
            .parent()
            .map(|dir| dir.join(TOKENIZER_FILE))
            .unwrap_or_else(|| PathBuf::from(TOKENIZER_FILE))
    }
}

/// Loads a tokenizer that truncates to `max_len` tokens and never pads.
///
/// Sentences are encoded one at a time, so padding would only add masked positions.
pub fn load_tokenizer_with_truncation(
    model_path: &Path,
    max_len: usize,
) -> Result<Tokenizer, EmbeddingError> {
    let path = tokenizer_path(model_path);
    if !path.exists() {
        return Err(EmbeddingError::ModelNotFound { path });
    }

    let mut tokenizer =
        Tokenizer::from_file(&path).map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("failed to read {}: {e}", path.display()),
        })?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("failed to configure truncation: {e}"),
        })?;
    tokenizer.with_padding(None);

    Ok(tokenizer)
}
