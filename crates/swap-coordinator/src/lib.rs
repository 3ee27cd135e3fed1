//! cross-chain swap coordination
//!
//! the registry of revealed secrets plus the bidirectional mapping
//! between a local order hash and its foreign escrow id. one instance
//! lives on each chain; together they guarantee every preimage unlocks
//! at most one escrow per chain

pub mod coordinator;
pub mod error;
pub mod mapping;
pub mod outbound;

pub use coordinator::*;
pub use error::*;
pub use mapping::*;
pub use outbound::*;
