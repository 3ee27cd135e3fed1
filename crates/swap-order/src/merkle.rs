//! merkle tree over per-fragment secrets
//!
//! leaves are keccak-256 of each raw secret; an odd node at any level is
//! paired with itself. proofs order siblings by the leaf index bit at
//! each level, so the verifier needs the index alongside the path.
//!
//! this is not the sorted-pair scheme used for checkpoint inclusion
//! proofs; the two verify proofs from different producers and must stay
//! separate

use htlc_escrow::hashlock::keccak256;
use htlc_escrow::types::H256;

use crate::error::{OrderError, Result};

fn hash_pair(left: &H256, right: &H256) -> H256 {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(&left.0);
    data[32..].copy_from_slice(&right.0);
    keccak256(&data)
}

/// complete tree, all levels retained for proof extraction
pub struct SecretTree {
    layers: Vec<Vec<H256>>,
}

impl SecretTree {
    pub fn build<S: AsRef<[u8]>>(secrets: &[S]) -> Result<Self> {
        if secrets.is_empty() {
            return Err(OrderError::EmptySecretSet);
        }

        let leaves: Vec<H256> = secrets.iter().map(|s| keccak256(s.as_ref())).collect();
        let mut layers = vec![leaves];

        while layers[layers.len() - 1].len() > 1 {
            let next: Vec<H256> = layers[layers.len() - 1]
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    let right = pair.get(1).unwrap_or(left);
                    hash_pair(left, right)
                })
                .collect();
            layers.push(next);
        }

        Ok(Self { layers })
    }

    pub fn root(&self) -> H256 {
        self.layers[self.layers.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    pub fn leaf(&self, index: usize) -> Option<H256> {
        self.layers[0].get(index).copied()
    }

    /// sibling path from leaf `index` up to the root
    pub fn proof(&self, index: usize) -> Result<Vec<H256>> {
        if index >= self.leaf_count() {
            return Err(OrderError::SecretIndexOutOfBounds {
                index: index as u64,
                total: self.leaf_count() as u64,
            });
        }

        let mut path = Vec::with_capacity(self.depth());
        let mut i = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = if i ^ 1 < layer.len() { i ^ 1 } else { i };
            path.push(layer[sibling]);
            i /= 2;
        }
        Ok(path)
    }
}

/// fold a leaf up the tree, concatenation order chosen by the index bit
/// at each level
pub fn verify_proof(leaf: H256, proof: &[H256], root: H256, index: u64) -> bool {
    let mut hash = leaf;
    let mut idx = index;
    for sibling in proof {
        hash = if idx % 2 == 0 {
            hash_pair(&hash, sibling)
        } else {
            hash_pair(sibling, &hash)
        };
        idx /= 2;
    }
    hash == root
}
