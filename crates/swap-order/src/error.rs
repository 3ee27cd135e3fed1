//! error types for orders and partial fills

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrderError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order does not allow partial fills")]
    PartialFillsNotAllowed,

    #[error("fill percentage above 10000 basis points: {0}")]
    InvalidFillPercentage(u64),

    #[error("secret index {index} out of bounds for {total} secrets")]
    SecretIndexOutOfBounds { index: u64, total: u64 },

    #[error("merkle proof does not verify")]
    InvalidMerkleProof,

    #[error("order hash mismatch on registration")]
    InvalidOrderHash,

    #[error("no order under this hash")]
    UnknownOrder,

    #[error("merkle tree needs at least one secret")]
    EmptySecretSet,
}
