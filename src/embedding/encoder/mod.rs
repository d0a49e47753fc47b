//! Sentence embedder (BERT safetensors + tokenizer).
//!
//! Use [`EncoderConfig::stub`] for tests and for running without model files.

/// Encoder configuration.
pub mod config;


pub use config::{EncoderConfig, MODEL_FILES};

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::bert::BertEncoder;
use crate::embedding::device::select_device;
use crate::embedding::error::EmbeddingError;
use crate::embedding::utils::load_tokenizer_with_truncation;
use crate::hashing::{hash_text, splitmix64};

enum EncoderBackend {
    Model {
        model: BertEncoder,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub,
}

/// Maps text to L2-normalized vectors.
///
/// Stateless after load; every method takes `&self`, so one instance can be shared
/// across threads behind an `Arc`.
pub struct SentenceEmbedder {
    backend: EncoderBackend,
    config: EncoderConfig,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: EncoderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!(
                embedding_dim = config.embedding_dim,
                "Sentence embedder running in STUB mode (no semantic model loaded)"
            );
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
            });
        }

        let (device, backend) = select_device();
        debug!(backend = backend.as_str(), "Selected compute device for sentence embedder");

        let mut config = config;
        let (model, tokenizer) = Self::load_model(&config, &device)?;

        if model.hidden_size() != config.embedding_dim {
            warn!(
                configured = config.embedding_dim,
                hidden_size = model.hidden_size(),
                "Embedding dimension follows the model hidden size"
            );
            config.embedding_dim = model.hidden_size();
        }

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim = config.embedding_dim,
            max_seq_len = config.max_seq_len,
            "Sentence embedder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer,
                device,
            },
            config,
        })
    }

    /// Stub embedder with the default dimension. Infallible.
    pub fn stub() -> Self {
        Self {
            backend: EncoderBackend::Stub,
            config: EncoderConfig::stub(),
        }
    }

    fn load_model(
        config: &EncoderConfig,
        device: &Device,
    ) -> Result<(BertEncoder, Tokenizer), EmbeddingError> {
        let tokenizer = load_tokenizer_with_truncation(&config.model_dir, config.max_seq_len)?;

        let model = BertEncoder::load(&config.model_dir, device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            }
        })?;

        Ok((model, tokenizer))
    }

    /// Embeds one string.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.embed_with_model(text, model, tokenizer, device),
            EncoderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    /// Embeds each string in order. Output row `i` belongs to `texts[i]`.
    pub fn embed_batch<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text.as_ref())).collect()
    }

    fn embed_with_model(
        &self,
        text: &str,
        model: &BertEncoder,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        if encoding.get_ids().is_empty() {
            return Ok(vec![0.0; self.config.embedding_dim]);
        }

        debug!(
            text_len = text.len(),
            token_count = encoding.get_ids().len(),
            "Generating embedding"
        );

        let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;

        let embedding = model
            .encode(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Encoder forward pass failed: {}", e),
            })?
            .squeeze(0)?
            .to_vec1::<f32>()?;

        Ok(embedding)
    }

    /// Pseudo-random unit vector seeded by the BLAKE3 digest of the whole text.
    ///
    /// Identical strings map to identical vectors; different strings are nearly
    /// orthogonal, so the stub never invents paraphrase similarity.
    fn embed_stub(&self, text: &str) -> Vec<f32> {
        let digest = hash_text(text);
        let mut state = digest
            .chunks_exact(8)
            .map(|chunk| {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(chunk);
                u64::from_le_bytes(bytes)
            })
            .fold(0u64, |acc, word| acc ^ word);

        let mut embedding: Vec<f32> = (0..self.config.embedding_dim)
            .map(|_| {
                state = splitmix64(state);
                ((state >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
            })
            .collect();

        normalize(&mut embedding);
        embedding
    }

    /// Returns the output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    /// Returns the embedder configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

fn normalize(embedding: &mut [f32]) {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in embedding.iter_mut() {
            *x /= norm;
        }
    }
}
