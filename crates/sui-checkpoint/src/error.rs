//! error types for checkpoint verification

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VerifierError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifierError {
    #[error("insufficient stake: signed {signed} of {total}")]
    InsufficientStake { signed: u128, total: u128 },

    #[error("checkpoint has not been verified")]
    CheckpointNotVerified,

    #[error("inclusion proof does not verify")]
    InvalidMerkleProof,
}
