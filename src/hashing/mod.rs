use blake3::Hasher;

/// Computes a 64-bit hash of the input data using BLAKE3, truncated from 256 bits.
///
/// # Truncation Rationale
///
/// MinHash only needs a well-mixed 64-bit value per token before the permutation
/// family is applied, and band keys only need to spread signatures across buckets.
/// The first 8 bytes of a BLAKE3 digest are uniformly distributed, so truncation does
/// not bias either use.
///
/// # Collision Probability
///
/// With 64 bits, `P(collision) ≈ n² / (2 × 2^64)` for `n` distinct tokens. Vocabulary
/// sizes for a reference corpus are in the tens of thousands, so collisions are
/// negligible. A collision between two tokens would at worst make them count as the
/// same word in the Jaccard estimate.
///
/// # Stability
///
/// Unlike `std::collections::hash_map::DefaultHasher`, BLAKE3 output is specified and
/// does not change between toolchains, so signatures are reproducible across builds.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Base hash of one lexical token (already lowercased by the caller).
#[inline]
pub fn hash_token(token: &str) -> u64 {
    hash_to_u64(token.as_bytes())
}

/// Hashes one LSH band: the band position plus its slice of signature slots.
///
/// The band index is mixed in so identical slot runs in different bands land in
/// different keys.
#[inline]
pub fn hash_band(band: usize, slots: &[u64]) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(&(band as u64).to_le_bytes());
    hasher.update(b"|");
    for slot in slots {
        hasher.update(&slot.to_le_bytes());
    }

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

/// Stable text fingerprint, used by the stub embedder to seed its generator.
#[inline]
pub fn hash_text(text: &str) -> [u8; 32] {
    *blake3::hash(text.as_bytes()).as_bytes()
}

/// SplitMix64 step. Used to expand one seed into the permutation coefficients.
#[inline]
pub fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
