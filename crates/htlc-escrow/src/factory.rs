//! escrow factory
//!
//! owns creation of escrows on one side of one chain and emits the
//! deployment events the peer chain observes

use std::collections::HashMap;

use tracing::info;

use crate::error::{EscrowError, Result};
use crate::escrow::{Escrow, Immutables};
use crate::events::{DstEscrowCreated, FactoryEvent, SrcEscrowCreated};
use crate::hashlock::keccak256;
use crate::timelock::Side;
use crate::types::{Address, H256, Token};

/// deterministic escrow id: domain-tagged keccak over the identifying
/// immutables and the creation time
pub fn derive_escrow_id(immutables: &Immutables, t0: u64) -> H256 {
    let mut data = Vec::with_capacity(14 + 32 * 4 + 8);
    data.extend_from_slice(b"htlc-escrow-v1");
    data.extend_from_slice(&immutables.order_hash.0);
    data.extend_from_slice(&immutables.hash_lock.0);
    data.extend_from_slice(&immutables.maker.0);
    data.extend_from_slice(&immutables.taker.0);
    data.extend_from_slice(&t0.to_le_bytes());
    keccak256(&data)
}

pub struct EscrowFactory<T: Token> {
    id: H256,
    side: Side,
    escrows: HashMap<H256, Escrow<T>>,
    events: Vec<FactoryEvent>,
}

impl<T: Token> EscrowFactory<T> {
    pub fn new(id: H256, side: Side) -> Self {
        Self {
            id,
            side,
            escrows: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> H256 {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// create an empty escrow and emit the deployment event for the
    /// peer chain
    pub fn create_escrow(
        &mut self,
        immutables: Immutables,
        creator: Address,
        now: u64,
    ) -> Result<H256> {
        let escrow_id = derive_escrow_id(&immutables, now);
        if self.escrows.contains_key(&escrow_id) {
            return Err(EscrowError::DuplicateEscrow);
        }

        let escrow = Escrow::new(escrow_id, immutables.clone(), self.side, now)?;
        self.escrows.insert(escrow_id, escrow);

        let event = match self.side {
            Side::Src => FactoryEvent::SrcEscrowCreated(SrcEscrowCreated {
                factory_id: self.id,
                escrow_id,
                immutables,
                creator,
            }),
            Side::Dst => {
                let src_cancellation_timestamp = now + immutables.time_locks.src_cancellation;
                FactoryEvent::DstEscrowCreated(DstEscrowCreated {
                    factory_id: self.id,
                    escrow_id,
                    immutables,
                    creator,
                    src_cancellation_timestamp,
                })
            }
        };
        self.events.push(event);

        info!(escrow = %escrow_id, side = ?self.side, "escrow created");
        Ok(escrow_id)
    }

    pub fn escrow(&self, id: H256) -> Option<&Escrow<T>> {
        self.escrows.get(&id)
    }

    pub fn escrow_mut(&mut self, id: H256) -> Option<&mut Escrow<T>> {
        self.escrows.get_mut(&id)
    }

    pub fn events(&self) -> &[FactoryEvent] {
        &self.events
    }
}
