//! Semantic channel: sentence embeddings and nearest-neighbour search.
//!
//! Every corpus document is embedded once at build time. A query sentence is
//! embedded, its `k` nearest documents are retrieved by Euclidean distance `d`,
//! and each neighbour scores `round(100 / (1 + d), 2)`.

mod error;
pub mod flat;


pub use error::SemanticError;
pub use flat::{FlatL2Index, l2_distance};

use std::sync::Arc;

use tracing::{debug, info};

use crate::constants::round_to;
use crate::corpus::Document;
use crate::embedding::SentenceEmbedder;
use crate::matches::{Match, top_k};

/// One search hit: row index and its distance from the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f32,
}

/// Nearest-neighbour search over fixed-dimension vectors.
///
/// Rows are numbered in insertion order. `search` returns at most `k` neighbours,
/// closest first; an approximate index may return a different set but must keep
/// that ordering.
pub trait VectorIndex: Send + Sync {
    fn dim(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a row and returns its index.
    fn add(&mut self, vector: &[f32]) -> Result<usize, SemanticError>;

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, SemanticError>;
}

/// Maps a distance to a 0-100 similarity, rounded to two decimals.
#[inline]
pub fn distance_to_score(distance: f32) -> f64 {
    round_to(100.0 / (1.0 + f64::from(distance)), 2)
}

/// Corpus embeddings behind a [`VectorIndex`].
pub struct SemanticIndex {
    documents: Arc<[Document]>,
    embedder: Arc<SentenceEmbedder>,
    index: Box<dyn VectorIndex>,
    k: usize,
}

impl std::fmt::Debug for SemanticIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticIndex")
            .field("documents", &self.documents.len())
            .field("rows", &self.index.len())
            .field("dim", &self.index.dim())
            .field("k", &self.k)
            .finish()
    }
}

impl SemanticIndex {
    /// Embeds every document into a fresh [`FlatL2Index`].
    pub fn build(
        documents: Arc<[Document]>,
        embedder: Arc<SentenceEmbedder>,
        k: usize,
    ) -> Result<Self, SemanticError> {
        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        let vectors = embedder.embed_batch(&texts)?;
        let index = FlatL2Index::with_capacity(embedder.embedding_dim(), vectors.len());

        Self::from_vectors(documents, embedder, Box::new(index), &vectors, k)
    }

    /// Loads precomputed `vectors` (one per document, in order) into `index`.
    pub fn from_vectors(
        documents: Arc<[Document]>,
        embedder: Arc<SentenceEmbedder>,
        mut index: Box<dyn VectorIndex>,
        vectors: &[Vec<f32>],
        k: usize,
    ) -> Result<Self, SemanticError> {
        if vectors.len() != documents.len() {
            return Err(SemanticError::RowCountMismatch {
                documents: documents.len(),
                vectors: vectors.len(),
            });
        }

        for vector in vectors {
            index.add(vector)?;
        }

        if index.len() != documents.len() {
            return Err(SemanticError::RowCountMismatch {
                documents: documents.len(),
                vectors: index.len(),
            });
        }

        info!(
            documents = documents.len(),
            dim = index.dim(),
            k,
            stub = embedder.is_stub(),
            "Semantic index built"
        );

        Ok(Self {
            documents,
            embedder,
            index,
            k,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.index.dim()
    }

    /// Nearest documents for one sentence, closest first.
    pub fn search_sentence(&self, sentence: &str) -> Result<Vec<Match>, SemanticError> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(sentence)?;
        let neighbors = self.index.search(&query, self.k)?;

        debug!(
            sentence_len = sentence.len(),
            neighbors = neighbors.len(),
            "Semantic neighbours"
        );

        Ok(neighbors
            .into_iter()
            .filter_map(|n| {
                self.documents.get(n.index).map(|doc| {
                    Match::semantic(
                        sentence,
                        doc.text.as_str(),
                        distance_to_score(n.distance),
                        doc.source_id(),
                    )
                })
            })
            .collect())
    }

    /// Top-`k` matches across all sentences.
    pub fn search(&self, sentences: &[String]) -> Result<Vec<Match>, SemanticError> {
        let mut matches = Vec::new();
        for sentence in sentences {
            matches.extend(self.search_sentence(sentence)?);
        }
        Ok(top_k(matches, self.k))
    }
}
