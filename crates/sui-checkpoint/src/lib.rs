//! checkpoint and transaction-inclusion verification
//!
//! lets one chain accept events from the other: a checkpoint is trusted
//! once validators carrying at least two thirds of the presented stake
//! have signed it, and a transaction is trusted once a merkle path
//! links it to a trusted checkpoint

pub mod address;
pub mod checkpoint;
pub mod error;
pub mod proof;

pub use address::*;
pub use checkpoint::*;
pub use error::*;
pub use proof::*;

/// 32-byte hash
pub type Hash = [u8; 32];
