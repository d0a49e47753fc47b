//! Banded LSH over MinHash signatures.
//!
//! A signature of `P` slots is cut into `b` bands of `r` rows (`b * r <= P`). Two
//! signatures become candidates when any band hashes identically. The collision
//! probability for Jaccard `s` is `1 - (1 - s^r)^b`, an S-curve whose knee is placed
//! at the configured threshold by [`optimal_params`].

use std::collections::{BTreeSet, HashMap};

use crate::hashing::hash_band;

use super::minhash::Signature;

const FALSE_POSITIVE_WEIGHT: f64 = 0.5;
const FALSE_NEGATIVE_WEIGHT: f64 = 0.5;
const INTEGRATION_STEPS: usize = 200;

/// Band layout for a signature length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandParams {
    pub bands: usize,
    pub rows: usize,
}

fn collision_probability(s: f64, bands: usize, rows: usize) -> f64 {
    1.0 - (1.0 - s.powi(rows as i32)).powi(bands as i32)
}

/// Composite Simpson integration over `[lo, hi]`.
fn integrate<F: Fn(f64) -> f64>(f: F, lo: f64, hi: f64) -> f64 {
    if hi <= lo {
        return 0.0;
    }
    let n = INTEGRATION_STEPS;
    let h = (hi - lo) / n as f64;
    let mut sum = f(lo) + f(hi);
    for i in 1..n {
        let x = lo + i as f64 * h;
        sum += if i % 2 == 1 { 4.0 * f(x) } else { 2.0 * f(x) };
    }
    sum * h / 3.0
}

fn false_positive_mass(threshold: f64, bands: usize, rows: usize) -> f64 {
    integrate(|s| collision_probability(s, bands, rows), 0.0, threshold)
}

fn false_negative_mass(threshold: f64, bands: usize, rows: usize) -> f64 {
    integrate(|s| 1.0 - collision_probability(s, bands, rows), threshold, 1.0)
}

/// Picks `(b, r)` minimizing the weighted false-positive and false-negative
/// probability mass around `threshold`.
pub fn optimal_params(threshold: f64, permutations: usize) -> BandParams {
    let mut best = BandParams { bands: 1, rows: 1 };
    let mut min_error = f64::INFINITY;

    for bands in 1..=permutations {
        let max_rows = permutations / bands;
        for rows in 1..=max_rows {
            let fp = false_positive_mass(threshold, bands, rows);
            let fn_ = false_negative_mass(threshold, bands, rows);
            let error = fp * FALSE_POSITIVE_WEIGHT + fn_ * FALSE_NEGATIVE_WEIGHT;
            if error < min_error {
                min_error = error;
                best = BandParams { bands, rows };
            }
        }
    }

    best
}

/// Band tables mapping band keys to document indices.
#[derive(Debug, Clone)]
pub struct LshBuckets {
    params: BandParams,
    tables: Vec<HashMap<u64, Vec<usize>>>,
    len: usize,
}

impl LshBuckets {
    pub fn new(params: BandParams) -> Self {
        Self {
            params,
            tables: vec![HashMap::new(); params.bands],
            len: 0,
        }
    }

    pub fn with_threshold(threshold: f64, permutations: usize) -> Self {
        Self::new(optimal_params(threshold, permutations))
    }

    pub fn params(&self) -> BandParams {
        self.params
    }

    /// Number of inserted signatures.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds `id` to the bucket of each of its bands.
    pub fn insert(&mut self, id: usize, signature: &Signature) {
        for band in 0..self.params.bands {
            if let Some(key) = self.band_key(signature, band) {
                self.tables[band].entry(key).or_default().push(id);
            }
        }
        self.len += 1;
    }

    /// Union of every bucket the signature falls into, in ascending id order.
    pub fn query(&self, signature: &Signature) -> BTreeSet<usize> {
        let mut candidates = BTreeSet::new();
        for band in 0..self.params.bands {
            let Some(key) = self.band_key(signature, band) else {
                continue;
            };
            if let Some(bucket) = self.tables[band].get(&key) {
                candidates.extend(bucket.iter().copied());
            }
        }
        candidates
    }

    fn band_key(&self, signature: &Signature, band: usize) -> Option<u64> {
        let start = band * self.params.rows;
        let end = start + self.params.rows;
        signature
            .slots()
            .get(start..end)
            .map(|slots| hash_band(band, slots))
    }
}
