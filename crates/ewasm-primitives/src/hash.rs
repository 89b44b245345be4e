//! Keccak-256 hashing

use sha3::{Digest, Keccak256};

/// 32-byte hash
pub type H256 = [u8; 32];

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
