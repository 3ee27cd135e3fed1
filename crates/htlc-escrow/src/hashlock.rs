//! keccak-256 hashlock primitives
//!
//! keccak-256 is the single canonical hash on both ledgers; the hash
//! lock of an escrow is the digest of the raw preimage bytes

use sha3::{Digest, Keccak256};

use crate::types::H256;

pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256(hasher.finalize().into())
}

/// hash lock for a raw preimage
pub fn compute_hash_lock(secret: &[u8]) -> H256 {
    keccak256(secret)
}

/// check a candidate preimage against a lock
pub fn verify_hash(lock: &H256, secret: &[u8]) -> bool {
    compute_hash_lock(secret) == *lock
}
