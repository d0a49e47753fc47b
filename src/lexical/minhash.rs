//! MinHash signatures over lowercase whitespace tokens.
//!
//! Each token is hashed once with BLAKE3, then passed through `P` universal hash
//! functions `h_i(x) = (a_i * x + b_i) mod (2^61 - 1)`. Slot `i` of the signature is
//! the minimum of `h_i` over the token set, so the probability that two signatures
//! agree on a slot equals the Jaccard similarity of the underlying sets.

use std::collections::HashSet;

use crate::hashing::{hash_token, splitmix64};

/// Mersenne prime modulus for the permutation family.
pub const MERSENNE_PRIME: u64 = (1 << 61) - 1;

/// Lowercases and splits on whitespace. No stemming or stop-word removal.
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Fixed-length sketch of a token set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    slots: Vec<u64>,
}

impl Signature {
    pub fn slots(&self) -> &[u64] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Estimated Jaccard similarity: fraction of agreeing slots.
    ///
    /// Signatures of different lengths are incomparable and score `0.0`.
    pub fn jaccard(&self, other: &Signature) -> f64 {
        if self.slots.len() != other.slots.len() || self.slots.is_empty() {
            return 0.0;
        }

        let agreeing = self
            .slots
            .iter()
            .zip(other.slots.iter())
            .filter(|(a, b)| a == b)
            .count();

        agreeing as f64 / self.slots.len() as f64
    }
}

/// Seeded permutation family producing [`Signature`]s.
#[derive(Debug, Clone)]
pub struct MinHasher {
    coefficients: Vec<(u64, u64)>,
}

impl MinHasher {
    pub fn new(permutations: usize, seed: u64) -> Self {
        let mut state = seed;
        let mut next = || {
            state = splitmix64(state);
            state
        };

        let coefficients = (0..permutations)
            .map(|_| {
                let a = next() % (MERSENNE_PRIME - 1) + 1;
                let b = next() % MERSENNE_PRIME;
                (a, b)
            })
            .collect();

        Self { coefficients }
    }

    pub fn permutations(&self) -> usize {
        self.coefficients.len()
    }

    /// Signature of an already-tokenized set.
    pub fn signature<'a, I>(&self, tokens: I) -> Signature
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut slots = vec![u64::MAX; self.coefficients.len()];

        for token in tokens {
            let base = hash_token(token) % MERSENNE_PRIME;
            for (slot, &(a, b)) in slots.iter_mut().zip(self.coefficients.iter()) {
                let permuted = permute(a, b, base);
                if permuted < *slot {
                    *slot = permuted;
                }
            }
        }

        Signature { slots }
    }

    /// Tokenizes `text` and returns its signature.
    pub fn signature_of_text(&self, text: &str) -> Signature {
        let tokens = tokenize(text);
        self.signature(tokens.iter().map(String::as_str))
    }
}

#[inline]
fn permute(a: u64, b: u64, x: u64) -> u64 {
    let value = (a as u128) * (x as u128) + (b as u128);
    (value % MERSENNE_PRIME as u128) as u64
}
