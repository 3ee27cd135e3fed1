//! proof-verified partial fills
//!
//! each fill presents one leaf secret of the order's tree plus its
//! inclusion proof, and claims a slice of the order in basis points

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use htlc_escrow::hashlock::keccak256;
use htlc_escrow::types::{Address, H256};

use crate::error::{OrderError, Result};
use crate::merkle::verify_proof;
use crate::order::PartialFillOrder;

pub const BASIS_POINTS: u64 = 10_000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialFillExecuted {
    pub order_hash: H256,
    pub secret_index: u64,
    pub fill_percentage: u64,
    pub fill_amount: u64,
    pub executor: Address,
}

pub fn validate_partial_fill(
    order: &PartialFillOrder,
    secret: &[u8],
    proof: &[H256],
    index: u64,
    fill_bp: u64,
) -> Result<()> {
    if !order.allow_partial_fills {
        return Err(OrderError::PartialFillsNotAllowed);
    }
    if fill_bp > BASIS_POINTS {
        return Err(OrderError::InvalidFillPercentage(fill_bp));
    }
    if index >= order.total_secrets {
        return Err(OrderError::SecretIndexOutOfBounds {
            index,
            total: order.total_secrets,
        });
    }
    if !verify_proof(keccak256(secret), proof, order.merkle_root, index) {
        return Err(OrderError::InvalidMerkleProof);
    }
    Ok(())
}

/// execute a validated fill, accumulating the order's fill percentage
///
/// the accumulator is not capped at 10000 basis points; callers watching
/// the event stream see the overshoot
pub fn execute_partial_fill(
    order: &mut PartialFillOrder,
    secret: &[u8],
    proof: &[H256],
    index: u64,
    fill_bp: u64,
    executor: Address,
) -> Result<PartialFillExecuted> {
    validate_partial_fill(order, secret, proof, index, fill_bp)?;

    let fill_amount =
        (order.order.making_amount as u128 * fill_bp as u128 / BASIS_POINTS as u128) as u64;
    order.fill_percentage += fill_bp;
    order.secret_index = index;

    let event = PartialFillExecuted {
        order_hash: order.hash(),
        secret_index: index,
        fill_percentage: fill_bp,
        fill_amount,
        executor,
    };
    debug!(
        order = %event.order_hash,
        index,
        fill_bp,
        accumulated = order.fill_percentage,
        "partial fill executed"
    );
    Ok(event)
}

/// registry of partially fillable orders, keyed by order hash
#[derive(Default)]
pub struct OrderBook {
    orders: HashMap<H256, PartialFillOrder>,
    fills: Vec<PartialFillExecuted>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// admit an order produced by the off-chain matching layer; the
    /// claimed hash must match the canonical encoding
    pub fn register(&mut self, order: PartialFillOrder, claimed_hash: H256) -> Result<H256> {
        let order_hash = order.hash();
        if order_hash != claimed_hash {
            return Err(OrderError::InvalidOrderHash);
        }
        // re-registration keeps the existing fill progress
        self.orders.entry(order_hash).or_insert(order);
        Ok(order_hash)
    }

    pub fn order(&self, order_hash: H256) -> Option<&PartialFillOrder> {
        self.orders.get(&order_hash)
    }

    pub fn fills(&self) -> &[PartialFillExecuted] {
        &self.fills
    }

    pub fn fill(
        &mut self,
        order_hash: H256,
        secret: &[u8],
        proof: &[H256],
        index: u64,
        fill_bp: u64,
        executor: Address,
    ) -> Result<PartialFillExecuted> {
        let order = self
            .orders
            .get_mut(&order_hash)
            .ok_or(OrderError::UnknownOrder)?;
        let event = execute_partial_fill(order, secret, proof, index, fill_bp, executor)?;
        self.fills.push(event.clone());
        Ok(event)
    }
}
