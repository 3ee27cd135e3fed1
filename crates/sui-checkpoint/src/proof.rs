//! transaction inclusion proofs against a checkpoint
//!
//! the path is a flat byte string of sequential 32-byte siblings; at
//! each step the pair is concatenated in sorted order (min || max)
//! before hashing with keccak-256. this is not the index-ordered scheme
//! used for partial-fill proofs; the two verify proofs from different
//! producers and must stay separate

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::error::{Result, VerifierError};
use crate::Hash;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxProof {
    pub tx_hash: Hash,
    pub checkpoint_hash: Hash,
    /// flat sibling path, length a multiple of 32
    pub merkle_path: Vec<u8>,
    pub sequence: u64,
}

fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

fn hash_sorted_pair(a: &Hash, b: &Hash) -> Hash {
    let mut data = [0u8; 64];
    if a.as_slice() <= b.as_slice() {
        data[..32].copy_from_slice(a);
        data[32..].copy_from_slice(b);
    } else {
        data[..32].copy_from_slice(b);
        data[32..].copy_from_slice(a);
    }
    keccak256(&data)
}

/// walk the flat path from `tx_hash` and require arrival at `root`
pub fn verify_inclusion(tx_hash: Hash, path: &[u8], root: Hash) -> Result<()> {
    if path.len() % 32 != 0 {
        return Err(VerifierError::InvalidMerkleProof);
    }

    let mut hash = tx_hash;
    for chunk in path.chunks_exact(32) {
        let mut sibling = [0u8; 32];
        sibling.copy_from_slice(chunk);
        hash = hash_sorted_pair(&hash, &sibling);
    }

    if hash != root {
        return Err(VerifierError::InvalidMerkleProof);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root of a four-leaf sorted-pair tree plus the path for one leaf
    fn four_leaf_fixture() -> (Hash, [Hash; 4], Vec<u8>) {
        let leaves = [[1u8; 32], [2u8; 32], [3u8; 32], [4u8; 32]];
        let p01 = hash_sorted_pair(&leaves[0], &leaves[1]);
        let p23 = hash_sorted_pair(&leaves[2], &leaves[3]);
        let root = hash_sorted_pair(&p01, &p23);

        // path for leaf 2: sibling leaf 3, then the left pair hash
        let mut path = Vec::new();
        path.extend_from_slice(&leaves[3]);
        path.extend_from_slice(&p01);
        (root, leaves, path)
    }

    #[test]
    fn test_inclusion_round_trip() {
        let (root, leaves, path) = four_leaf_fixture();
        verify_inclusion(leaves[2], &path, root).unwrap();
    }

    #[test]
    fn test_pair_order_is_sorted() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_eq!(hash_sorted_pair(&a, &b), hash_sorted_pair(&b, &a));
    }

    #[test]
    fn test_wrong_leaf_fails() {
        let (root, _, path) = four_leaf_fixture();
        assert_eq!(
            verify_inclusion([9u8; 32], &path, root),
            Err(VerifierError::InvalidMerkleProof)
        );
    }

    #[test]
    fn test_corrupted_path_fails() {
        let (root, leaves, mut path) = four_leaf_fixture();
        path[0] ^= 1;
        assert_eq!(
            verify_inclusion(leaves[2], &path, root),
            Err(VerifierError::InvalidMerkleProof)
        );
    }

    #[test]
    fn test_ragged_path_fails() {
        let (root, leaves, mut path) = four_leaf_fixture();
        path.push(0);
        assert_eq!(
            verify_inclusion(leaves[2], &path, root),
            Err(VerifierError::InvalidMerkleProof)
        );
    }

    #[test]
    fn test_empty_path_is_the_root_itself() {
        let leaf = [5u8; 32];
        verify_inclusion(leaf, &[], leaf).unwrap();
        assert!(verify_inclusion(leaf, &[], [6u8; 32]).is_err());
    }
}
