//! error types for the escrow state machine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EscrowError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EscrowError {
    #[error("timelock offsets out of order")]
    InvalidTimeLocks,

    #[error("caller not permitted for this phase or role")]
    Unauthorized,

    #[error("escrow already reached a terminal state")]
    EscrowCompleted,

    #[error("preimage does not match hash lock")]
    InvalidSecret,

    #[error("timelock window not yet open")]
    TimeLockNotExpired,

    #[error("escrow has not been funded")]
    NotFunded,

    #[error("escrow already funded")]
    AlreadyFunded,

    #[error("deposit short of immutables: expected {expected}, got {got}")]
    DepositMismatch { expected: u64, got: u64 },

    #[error("invalid immutables: {0}")]
    InvalidImmutables(&'static str),

    #[error("escrow id already in use")]
    DuplicateEscrow,

    #[error("no escrow under this id")]
    UnknownEscrow,
}
