//! SHA-256 hashing utilities
//!
//! Block hashes, transaction digests, and the proof-of-work target check
//! all go through here.

use sha2::{Digest, Sha256};

/// Computes the SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes the SHA-256 hash and returns it as a lowercase hex string
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// Checks whether a hex-encoded hash meets the difficulty target.
///
/// Difficulty is the number of leading `'0'` characters the hex string
/// must carry.
pub fn meets_difficulty(hash_hex: &str, difficulty: usize) -> bool {
    hash_hex.len() >= difficulty && hash_hex.bytes().take(difficulty).all(|b| b == b'0')
}
