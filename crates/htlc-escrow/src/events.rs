//! lifecycle and deployment events
//!
//! relayers watch these on one chain and act on the other; field layout
//! is part of the cross-chain contract. `Withdrawn` carries the raw
//! preimage bytes, that emission IS the secret side-channel

use serde::{Deserialize, Serialize};

use crate::escrow::Immutables;
use crate::types::{Address, H256};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EscrowCreated {
    pub escrow_id: H256,
    pub maker: Address,
    pub taker: Address,
    pub amount: u64,
    pub hash_lock: H256,
    pub foreign_order_hash: H256,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deposited {
    pub escrow_id: H256,
    pub depositor: Address,
    pub amount: u64,
    pub safety_deposit: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Withdrawn {
    pub escrow_id: H256,
    /// raw preimage bytes, never hashed or truncated before emission
    pub secret: Vec<u8>,
    pub to: Address,
    pub amount: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cancelled {
    pub escrow_id: H256,
    pub to: Address,
    pub amount: u64,
}

/// per-escrow lifecycle event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EscrowEvent {
    Created(EscrowCreated),
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    Cancelled(Cancelled),
}

impl From<EscrowCreated> for EscrowEvent {
    fn from(e: EscrowCreated) -> Self {
        Self::Created(e)
    }
}

impl From<Deposited> for EscrowEvent {
    fn from(e: Deposited) -> Self {
        Self::Deposited(e)
    }
}

impl From<Withdrawn> for EscrowEvent {
    fn from(e: Withdrawn) -> Self {
        Self::Withdrawn(e)
    }
}

impl From<Cancelled> for EscrowEvent {
    fn from(e: Cancelled) -> Self {
        Self::Cancelled(e)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SrcEscrowCreated {
    pub factory_id: H256,
    pub escrow_id: H256,
    pub immutables: Immutables,
    pub creator: Address,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DstEscrowCreated {
    pub factory_id: H256,
    pub escrow_id: H256,
    pub immutables: Immutables,
    pub creator: Address,
    /// absolute time the source leg becomes cancellable; the destination
    /// escrow must be resolved before this
    pub src_cancellation_timestamp: u64,
}

/// factory deployment event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum FactoryEvent {
    SrcEscrowCreated(SrcEscrowCreated),
    DstEscrowCreated(DstEscrowCreated),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SrcEscrowDeployed {
    pub resolver_id: H256,
    pub escrow_id: H256,
    pub immutables: Immutables,
    pub deployer: Address,
    pub foreign_order_hash: H256,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnershipTransferred {
    pub resolver_id: H256,
    pub previous_owner: Address,
    pub new_owner: Address,
}

/// resolver event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResolverEvent {
    SrcEscrowDeployed(SrcEscrowDeployed),
    OwnershipTransferred(OwnershipTransferred),
}
