//! CopyLess library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`PlagiarismService`], [`Verdict`], [`ServiceError`] - The `check` facade
//! - [`Config`], [`EngineConfig`], [`ConfigError`] - Server and engine configuration
//! - [`Match`], [`MatchType`] - Evidence records from both channels
//!
//! ## Channels
//! - [`LexicalIndex`] - MinHash/LSH near-duplicate search with a verbatim shortcut
//! - [`SemanticIndex`], [`VectorIndex`], [`FlatL2Index`] - Exact L2 search over embeddings
//! - [`SentenceEmbedder`], [`EncoderConfig`] - Sentence embeddings (BERT or stub)
//!
//! ## Scoring
//! - [`ScoreFusion`], [`FusedScore`], [`calibrate`] - Channel fusion and calibration
//!
//! ## Web
//! - [`WebComparer`], [`WebMatch`] - Live comparison against search results
//!
//! ## Test/Mock Support
//! Mock search and fetch implementations are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod corpus;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod lexical;
pub mod matches;
pub mod pipeline;
pub mod scoring;
pub mod semantic;
pub mod service;
pub mod web;

pub use config::{Config, ConfigError, EngineConfig};
pub use corpus::{CorpusError, Document, load_corpus, split_documents};
pub use embedding::{EmbeddingError, EncoderConfig, SentenceEmbedder, cosine_similarity};
pub use hashing::{hash_band, hash_text, hash_to_u64, hash_token};
pub use lexical::{LexicalError, LexicalIndex, MinHasher, Signature};
pub use matches::{Match, MatchType};
pub use pipeline::{ChannelMatches, QueryPipeline, split_sentences};
pub use scoring::{FusedScore, ScoreFusion, calibrate, channel_max};
pub use semantic::{FlatL2Index, Neighbor, SemanticError, SemanticIndex, VectorIndex};
pub use service::{PlagiarismService, ServiceError, Verdict};
#[cfg(any(test, feature = "mock"))]
pub use web::{MockPageFetcher, MockSearchProvider};
pub use web::{WebComparer, WebError, WebMatch};
