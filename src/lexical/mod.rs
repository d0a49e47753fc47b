//! Lexical channel: MinHash/LSH candidate retrieval plus verbatim containment.
//!
//! Token-bag MinHash ignores where words sit, so a short sentence copied verbatim
//! into a long paragraph can estimate well below its real overlap. Every query
//! sentence is therefore also checked for raw substring containment against each
//! document, and a hit scores exactly [`VERBATIM_SCORE`] regardless of threshold.

mod error;
pub mod lsh;
pub mod minhash;


pub use error::LexicalError;
pub use lsh::{BandParams, LshBuckets, optimal_params};
pub use minhash::{MinHasher, Signature, tokenize};

use std::sync::Arc;

use tracing::{debug, info};

use crate::constants::{MINHASH_SEED, VERBATIM_SCORE, round_to};
use crate::corpus::Document;
use crate::matches::{Match, top_k};

/// MinHash signatures and LSH buckets for every corpus document.
#[derive(Debug, Clone)]
pub struct LexicalIndex {
    documents: Arc<[Document]>,
    hasher: MinHasher,
    signatures: Vec<Signature>,
    buckets: LshBuckets,
    threshold: f64,
    k: usize,
}

impl LexicalIndex {
    /// Builds signatures and buckets for `documents`.
    pub fn build(
        documents: Arc<[Document]>,
        permutations: usize,
        threshold: f64,
        k: usize,
    ) -> Result<Self, LexicalError> {
        if permutations == 0 {
            return Err(LexicalError::InvalidConfig {
                reason: "permutations must be greater than zero".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(LexicalError::InvalidConfig {
                reason: format!("threshold must be between 0.0 and 1.0, got {threshold}"),
            });
        }

        let hasher = MinHasher::new(permutations, MINHASH_SEED);
        let mut buckets = LshBuckets::with_threshold(threshold, permutations);

        let signatures: Vec<Signature> = documents
            .iter()
            .map(|doc| hasher.signature_of_text(&doc.text))
            .collect();

        // Bucket ids are positions into `documents` and `signatures`.
        for (position, signature) in signatures.iter().enumerate() {
            buckets.insert(position, signature);
        }

        let params = buckets.params();
        info!(
            documents = signatures.len(),
            permutations,
            threshold,
            bands = params.bands,
            rows = params.rows,
            "Lexical index built"
        );

        Ok(Self {
            documents,
            hasher,
            signatures,
            buckets,
            threshold,
            k,
        })
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn band_params(&self) -> BandParams {
        self.buckets.params()
    }

    /// Signature stored for the document at `position`.
    pub fn signature(&self, position: usize) -> Option<&Signature> {
        self.signatures.get(position)
    }

    /// Matches for one sentence, unsorted: verbatim hits first, then LSH hits.
    pub fn search_sentence(&self, sentence: &str) -> Vec<Match> {
        let mut matches = Vec::new();

        let needle = sentence.trim();
        if !needle.is_empty() {
            for doc in self.documents.iter().filter(|d| d.text.contains(needle)) {
                matches.push(Match::lexical(
                    sentence,
                    doc.text.as_str(),
                    VERBATIM_SCORE,
                    doc.source_id(),
                ));
            }
        }

        let tokens = tokenize(sentence);
        if tokens.is_empty() {
            return matches;
        }

        let query = self.hasher.signature(tokens.iter().map(String::as_str));
        let candidates = self.buckets.query(&query);

        debug!(
            sentence_len = sentence.len(),
            candidates = candidates.len(),
            verbatim = matches.len(),
            "Lexical candidates"
        );

        for position in candidates {
            let (Some(candidate), Some(doc)) =
                (self.signatures.get(position), self.documents.get(position))
            else {
                continue;
            };

            let jaccard = query.jaccard(candidate);
            if jaccard >= self.threshold {
                matches.push(Match::lexical(
                    sentence,
                    doc.text.as_str(),
                    round_to(jaccard * 100.0, 2),
                    doc.source_id(),
                ));
            }
        }

        matches
    }

    /// Top-`k` matches across all sentences.
    pub fn search(&self, sentences: &[String]) -> Vec<Match> {
        let matches: Vec<Match> = sentences
            .iter()
            .flat_map(|sentence| self.search_sentence(sentence))
            .collect();
        top_k(matches, self.k)
    }
}
