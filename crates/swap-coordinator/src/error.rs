//! error types for cross-chain coordination

use thiserror::Error;

use htlc_escrow::error::EscrowError;

pub type Result<T> = std::result::Result<T, CoordinatorError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("secret already coordinated")]
    SecretAlreadyCoordinated,

    #[error("secret already used")]
    SecretAlreadyUsed,

    #[error("no coordinated secret for this foreign escrow")]
    UnknownForeignEscrow,

    #[error("mapping endpoint already bound to a different counterpart")]
    MappingConflict,

    #[error("invalid secret")]
    InvalidSecret,

    #[error("zero identifier")]
    InvalidIdentifier,

    #[error("caller not permitted")]
    Unauthorized,

    #[error("coordination timeout has not elapsed")]
    ResetTimeoutActive,

    #[error("no swap under this order hash")]
    UnknownOrder,

    #[error("swap already initiated for this order hash")]
    DuplicateOrder,

    #[error("swap is no longer active")]
    SwapInactive,

    #[error("safety deposit short: need {need}, got {got}")]
    InsufficientDeposit { need: u64, got: u64 },

    #[error("local secret has not been revealed")]
    SecretNotRevealed,

    #[error(transparent)]
    Escrow(#[from] EscrowError),
}
