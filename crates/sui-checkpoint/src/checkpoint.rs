//! stake-weighted checkpoint signature verification
//!
//! a checkpoint is accepted when the validators whose ed25519
//! signatures verify over its hash carry at least two thirds of the
//! presented stake. verified checkpoints and transactions are memoized
//! for the life of the verifier

use std::collections::{HashMap, HashSet};

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use tracing::{debug, info};

use crate::error::{Result, VerifierError};
use crate::proof::{verify_inclusion, TxProof};
use crate::Hash;

/// threshold in basis points; strictly at least 2/3 of presented stake
pub const STAKE_THRESHOLD_BPS: u128 = 6_667;
pub const BPS_DENOMINATOR: u128 = 10_000;

/// one validator's attestation over a checkpoint hash
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidatorSignature {
    pub public_key: [u8; 32],
    #[serde(with = "BigArray")]
    pub signature: [u8; 64],
    pub stake: u64,
}

pub struct CheckpointVerifier {
    /// checkpoint hash -> sequence it was verified at
    verified_checkpoints: HashMap<Hash, u64>,
    verified_transactions: HashSet<Hash>,
}

impl Default for CheckpointVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckpointVerifier {
    pub fn new() -> Self {
        Self {
            verified_checkpoints: HashMap::new(),
            verified_transactions: HashSet::new(),
        }
    }

    /// sum of the stake behind signatures that actually verify
    fn signed_stake(checkpoint_hash: &Hash, signatures: &[ValidatorSignature]) -> u128 {
        signatures
            .iter()
            .filter(|sig| {
                let Ok(key) = VerifyingKey::from_bytes(&sig.public_key) else {
                    return false;
                };
                let signature = Signature::from_bytes(&sig.signature);
                key.verify(checkpoint_hash, &signature).is_ok()
            })
            .map(|sig| sig.stake as u128)
            .sum()
    }

    pub fn verify_checkpoint(
        &mut self,
        checkpoint_hash: Hash,
        signatures: &[ValidatorSignature],
        sequence: u64,
    ) -> Result<()> {
        if self.verified_checkpoints.contains_key(&checkpoint_hash) {
            return Ok(());
        }

        let total: u128 = signatures.iter().map(|s| s.stake as u128).sum();
        let signed = Self::signed_stake(&checkpoint_hash, signatures);

        // an empty or zero-stake set would satisfy the bare inequality
        // vacuously; reject it outright
        if total == 0 || signed * BPS_DENOMINATOR < total * STAKE_THRESHOLD_BPS {
            return Err(VerifierError::InsufficientStake { signed, total });
        }

        self.verified_checkpoints.insert(checkpoint_hash, sequence);
        info!(
            checkpoint = %hex::encode(checkpoint_hash),
            sequence,
            signed,
            total,
            "checkpoint verified"
        );
        Ok(())
    }

    pub fn is_checkpoint_verified(&self, checkpoint_hash: &Hash) -> bool {
        self.verified_checkpoints.contains_key(checkpoint_hash)
    }

    pub fn checkpoint_sequence(&self, checkpoint_hash: &Hash) -> Option<u64> {
        self.verified_checkpoints.get(checkpoint_hash).copied()
    }

    /// verify a transaction was included in an already-verified
    /// checkpoint
    pub fn verify_transaction(&mut self, proof: &TxProof) -> Result<()> {
        if self.verified_transactions.contains(&proof.tx_hash) {
            return Ok(());
        }
        if !self.is_checkpoint_verified(&proof.checkpoint_hash) {
            return Err(VerifierError::CheckpointNotVerified);
        }
        verify_inclusion(proof.tx_hash, &proof.merkle_path, proof.checkpoint_hash)?;

        self.verified_transactions.insert(proof.tx_hash);
        debug!(tx = %hex::encode(proof.tx_hash), "transaction inclusion verified");
        Ok(())
    }

    pub fn is_transaction_verified(&self, tx_hash: &Hash) -> bool {
        self.verified_transactions.contains(tx_hash)
    }
}
