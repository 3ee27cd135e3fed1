//! cross-chain secret relay
//!
//! one coordinator lives on each chain. relayers feed it secrets
//! revealed on the peer chain; local escrows are then unlocked through
//! it, which is what enforces one-shot consumption of every preimage.
//! relaying is permissionless: a wrong secret is harmless because the
//! local escrow's hashlock rejects it

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use htlc_escrow::escrow::{Escrow, Payout};
use htlc_escrow::types::{Address, H256, Token};

use crate::error::{CoordinatorError, Result};
use crate::mapping::BidirectionalMap;
use crate::outbound::OutboundSwap;

/// seconds a coordinated secret is protected from emergency reset
pub const COORDINATION_TIMEOUT: u64 = 3_600;

/// which chain a coordinator instance lives on
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Chain {
    Eth,
    Sui,
}

impl Chain {
    pub fn peer(self) -> Self {
        match self {
            Chain::Eth => Chain::Sui,
            Chain::Sui => Chain::Eth,
        }
    }
}

/// coordination progress for one tracked escrow or order
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CoordinationStatus {
    SecretCoordinated,
    SecretAvailableCrossChain,
    MappingRegistered,
    LocalWithdrawalComplete,
    Cancelled,
    EmergencyReset,
    BidirectionalCompleted,
    ForeignEscrowInitiated,
}

impl CoordinationStatus {
    /// wire tag observers match on
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecretCoordinated => "SECRET_COORDINATED",
            Self::SecretAvailableCrossChain => "SECRET_AVAILABLE_CROSS_CHAIN",
            Self::MappingRegistered => "MAPPING_REGISTERED",
            Self::LocalWithdrawalComplete => "LOCAL_WITHDRAWAL_COMPLETE",
            Self::Cancelled => "CANCELLED",
            Self::EmergencyReset => "EMERGENCY_RESET",
            Self::BidirectionalCompleted => "BIDIRECTIONAL_COMPLETED",
            Self::ForeignEscrowInitiated => "FOREIGN_ESCROW_INITIATED",
        }
    }
}

/// a relayed secret and everything known about it
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoordinatedSecret {
    pub secret: Vec<u8>,
    /// coordinated and not yet consumed on either chain
    pub available: bool,
    pub timestamp: u64,
    pub coordinator: Address,
    pub status: CoordinationStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretCoordinated {
    pub foreign_escrow_id: H256,
    pub local_order_hash: H256,
    pub secret: Vec<u8>,
    pub coordinator: Address,
    pub timestamp: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrossChainSwapCompleted {
    pub order_hash: H256,
    pub src_chain: Chain,
    pub dst_chain: Chain,
    pub src_amount: u64,
    pub dst_amount: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmergencyReset {
    pub foreign_escrow_id: H256,
    pub coordinator: Address,
    pub timestamp: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboundInitiated {
    pub order_hash: H256,
    pub secret_hash: H256,
    pub amount: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalSecretRevealed {
    pub order_hash: H256,
    pub secret: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CoordinatorEvent {
    SecretCoordinated(SecretCoordinated),
    CrossChainSwapCompleted(CrossChainSwapCompleted),
    EmergencyReset(EmergencyReset),
    OutboundInitiated(OutboundInitiated),
    LocalSecretRevealed(LocalSecretRevealed),
}

pub struct Coordinator {
    owner: Address,
    chain: Chain,
    coordination_timeout: u64,

    /// foreign escrow id -> relayed preimage
    live_secrets: HashMap<H256, Vec<u8>>,
    secret_coordinated: HashSet<Vec<u8>>,
    secret_timestamp: HashMap<Vec<u8>, u64>,
    secret_coordinator: HashMap<Vec<u8>, Address>,
    /// preimages consumed by a local withdrawal; permanent
    revealed_secrets: HashSet<Vec<u8>>,
    /// preimages consumed on the peer chain; permanent
    pub(crate) secret_used_on_foreign: HashSet<Vec<u8>>,

    pub(crate) coordination_status: HashMap<H256, CoordinationStatus>,
    pub(crate) mapping: BidirectionalMap,
    pub(crate) outbound: HashMap<H256, OutboundSwap>,
    pub(crate) events: Vec<CoordinatorEvent>,
}

impl Coordinator {
    pub fn new(owner: Address, chain: Chain) -> Self {
        Self {
            owner,
            chain,
            coordination_timeout: COORDINATION_TIMEOUT,
            live_secrets: HashMap::new(),
            secret_coordinated: HashSet::new(),
            secret_timestamp: HashMap::new(),
            secret_coordinator: HashMap::new(),
            revealed_secrets: HashSet::new(),
            secret_used_on_foreign: HashSet::new(),
            coordination_status: HashMap::new(),
            mapping: BidirectionalMap::new(),
            outbound: HashMap::new(),
            events: Vec::new(),
        }
    }

    pub fn with_coordination_timeout(mut self, seconds: u64) -> Self {
        self.coordination_timeout = seconds;
        self
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn status(&self, id: H256) -> Option<CoordinationStatus> {
        self.coordination_status.get(&id).copied()
    }

    pub fn mapping(&self) -> &BidirectionalMap {
        &self.mapping
    }

    pub fn events(&self) -> &[CoordinatorEvent] {
        &self.events
    }

    pub(crate) fn is_consumed(&self, secret: &[u8]) -> bool {
        self.revealed_secrets.contains(secret) || self.secret_used_on_foreign.contains(secret)
    }

    /// store a secret revealed on the peer chain
    ///
    /// permissionless; a bogus secret wastes the relayer's gas and
    /// nothing else
    pub fn coordinate_secret_from_foreign(
        &mut self,
        foreign_escrow_id: H256,
        revealed_secret: &[u8],
        local_order_hash: H256,
        coordinator: Address,
        now: u64,
    ) -> Result<()> {
        if revealed_secret.is_empty() {
            return Err(CoordinatorError::InvalidSecret);
        }
        if foreign_escrow_id.is_zero() {
            return Err(CoordinatorError::InvalidIdentifier);
        }
        if self.secret_coordinated.contains(revealed_secret) {
            return Err(CoordinatorError::SecretAlreadyCoordinated);
        }

        // register the pairing on first sight of this escrow
        if !self.mapping.contains_foreign(foreign_escrow_id) {
            self.mapping.insert(foreign_escrow_id, local_order_hash)?;
        }

        let secret = revealed_secret.to_vec();
        self.live_secrets.insert(foreign_escrow_id, secret.clone());
        self.secret_coordinated.insert(secret.clone());
        self.secret_timestamp.insert(secret.clone(), now);
        self.secret_coordinator.insert(secret.clone(), coordinator);
        self.coordination_status
            .insert(foreign_escrow_id, CoordinationStatus::SecretCoordinated);

        self.events
            .push(CoordinatorEvent::SecretCoordinated(SecretCoordinated {
                foreign_escrow_id,
                local_order_hash,
                secret,
                coordinator,
                timestamp: now,
            }));
        info!(
            foreign_escrow = %foreign_escrow_id,
            order = %local_order_hash,
            chain = ?self.chain,
            "secret coordinated from foreign chain"
        );
        Ok(())
    }

    /// idempotent registration of the order <-> escrow pairing
    pub fn register_mapping(
        &mut self,
        foreign_escrow_id: H256,
        local_order_hash: H256,
    ) -> Result<()> {
        if foreign_escrow_id.is_zero() || local_order_hash.is_zero() {
            return Err(CoordinatorError::InvalidIdentifier);
        }
        self.mapping.insert(foreign_escrow_id, local_order_hash)?;
        self.coordination_status
            .entry(foreign_escrow_id)
            .or_insert(CoordinationStatus::MappingRegistered);
        Ok(())
    }

    pub fn get_coordinated_secret(&self, foreign_escrow_id: H256) -> Option<CoordinatedSecret> {
        let secret = self.live_secrets.get(&foreign_escrow_id)?;
        Some(CoordinatedSecret {
            secret: secret.clone(),
            available: self.secret_coordinated.contains(secret) && !self.is_consumed(secret),
            timestamp: self.secret_timestamp.get(secret).copied().unwrap_or(0),
            coordinator: self
                .secret_coordinator
                .get(secret)
                .copied()
                .unwrap_or_default(),
            status: self
                .status(foreign_escrow_id)
                .unwrap_or(CoordinationStatus::SecretCoordinated),
        })
    }

    /// unlock a local escrow with a secret relayed from the peer chain
    ///
    /// consumption is marked only after the escrow accepts the secret,
    /// so a failed withdrawal leaves the coordinator untouched
    pub fn withdraw_with_coordinated_secret<T: Token>(
        &mut self,
        escrow: &mut Escrow<T>,
        foreign_escrow_id: H256,
        caller: Address,
        now: u64,
    ) -> Result<Payout<T>> {
        let secret = self
            .live_secrets
            .get(&foreign_escrow_id)
            .cloned()
            .ok_or(CoordinatorError::UnknownForeignEscrow)?;
        if !self.secret_coordinated.contains(&secret) {
            return Err(CoordinatorError::UnknownForeignEscrow);
        }
        if self.is_consumed(&secret) {
            return Err(CoordinatorError::SecretAlreadyUsed);
        }

        let payout = escrow.withdraw(caller, &secret, now)?;

        self.revealed_secrets.insert(secret);
        self.coordination_status.insert(
            foreign_escrow_id,
            CoordinationStatus::LocalWithdrawalComplete,
        );

        let order_hash = self
            .mapping
            .local_for(foreign_escrow_id)
            .unwrap_or(escrow.immutables().order_hash);
        let amount = escrow.immutables().amount;
        self.events.push(CoordinatorEvent::CrossChainSwapCompleted(
            CrossChainSwapCompleted {
                order_hash,
                src_chain: self.chain.peer(),
                dst_chain: self.chain,
                src_amount: amount,
                dst_amount: amount,
            },
        ));
        info!(
            foreign_escrow = %foreign_escrow_id,
            escrow = %escrow.id(),
            "local escrow unlocked with coordinated secret"
        );
        Ok(payout)
    }

    /// relay a batch of secrets, silently skipping any that are already
    /// coordinated; any other failure aborts the batch
    pub fn batch_coordinate_secrets(
        &mut self,
        entries: &[(H256, Vec<u8>, H256)],
        coordinator: Address,
        now: u64,
    ) -> Result<usize> {
        let mut coordinated = 0;
        for (foreign_escrow_id, secret, local_order_hash) in entries {
            match self.coordinate_secret_from_foreign(
                *foreign_escrow_id,
                secret,
                *local_order_hash,
                coordinator,
                now,
            ) {
                Ok(()) => coordinated += 1,
                Err(CoordinatorError::SecretAlreadyCoordinated) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(coordinated)
    }

    /// owner-only teardown of a stale coordination row; the only
    /// destructive operation
    pub fn emergency_reset(
        &mut self,
        foreign_escrow_id: H256,
        caller: Address,
        now: u64,
    ) -> Result<()> {
        if caller != self.owner {
            return Err(CoordinatorError::Unauthorized);
        }
        let secret = self
            .live_secrets
            .get(&foreign_escrow_id)
            .cloned()
            .ok_or(CoordinatorError::UnknownForeignEscrow)?;
        let coordinated_at = self.secret_timestamp.get(&secret).copied().unwrap_or(0);
        if now <= coordinated_at + self.coordination_timeout {
            return Err(CoordinatorError::ResetTimeoutActive);
        }

        self.live_secrets.remove(&foreign_escrow_id);
        self.secret_coordinated.remove(&secret);
        self.secret_timestamp.remove(&secret);
        self.secret_coordinator.remove(&secret);
        self.coordination_status
            .insert(foreign_escrow_id, CoordinationStatus::EmergencyReset);

        self.events
            .push(CoordinatorEvent::EmergencyReset(EmergencyReset {
                foreign_escrow_id,
                coordinator: caller,
                timestamp: now,
            }));
        warn!(foreign_escrow = %foreign_escrow_id, "coordination row reset");
        Ok(())
    }

    /// owner-only note that the tracked escrow was observed cancelled
    pub fn record_cancellation(&mut self, id: H256, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(CoordinatorError::Unauthorized);
        }
        self.coordination_status
            .insert(id, CoordinationStatus::Cancelled);
        if let Some(swap) = self.outbound.get_mut(&id) {
            swap.active = false;
        }
        Ok(())
    }
}
