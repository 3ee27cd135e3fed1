//! bijective mapping between local order hashes and foreign escrow ids
//!
//! both directions are kept in lock step; registration is idempotent on
//! an identical pair and refuses a conflicting one

use std::collections::HashMap;

use htlc_escrow::types::H256;

use crate::error::{CoordinatorError, Result};

#[derive(Default)]
pub struct BidirectionalMap {
    foreign_to_local: HashMap<H256, H256>,
    local_to_foreign: HashMap<H256, H256>,
}

impl BidirectionalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, foreign_escrow_id: H256, local_order_hash: H256) -> Result<()> {
        match (
            self.foreign_to_local.get(&foreign_escrow_id),
            self.local_to_foreign.get(&local_order_hash),
        ) {
            (Some(local), Some(foreign))
                if *local == local_order_hash && *foreign == foreign_escrow_id =>
            {
                // identical pair, a no-op
                Ok(())
            }
            (None, None) => {
                self.foreign_to_local
                    .insert(foreign_escrow_id, local_order_hash);
                self.local_to_foreign
                    .insert(local_order_hash, foreign_escrow_id);
                Ok(())
            }
            _ => Err(CoordinatorError::MappingConflict),
        }
    }

    pub fn local_for(&self, foreign_escrow_id: H256) -> Option<H256> {
        self.foreign_to_local.get(&foreign_escrow_id).copied()
    }

    pub fn foreign_for(&self, local_order_hash: H256) -> Option<H256> {
        self.local_to_foreign.get(&local_order_hash).copied()
    }

    pub fn contains_foreign(&self, foreign_escrow_id: H256) -> bool {
        self.foreign_to_local.contains_key(&foreign_escrow_id)
    }

    pub fn contains_local(&self, local_order_hash: H256) -> bool {
        self.local_to_foreign.contains_key(&local_order_hash)
    }
}
