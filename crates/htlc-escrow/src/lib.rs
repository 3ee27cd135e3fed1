//! hash-time-locked escrow for cross-chain atomic swaps
//!
//! both legs of a swap run the same state machine: an escrow is created
//! by a factory, funded by the taker, then either withdrawn against the
//! preimage of its hash lock or cancelled once a timelock window opens.
//! the `Withdrawn` event carries the raw preimage, which is how the
//! secret crosses chains

pub mod error;
pub mod escrow;
pub mod events;
pub mod factory;
pub mod hashlock;
pub mod resolver;
pub mod timelock;
pub mod types;

pub use error::*;
pub use escrow::*;
pub use events::*;
pub use factory::*;
pub use hashlock::*;
pub use resolver::*;
pub use timelock::*;
pub use types::*;
