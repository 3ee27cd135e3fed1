//! outbound swaps: a local order initiates, a foreign escrow completes
//!
//! the mirror of the inbound flow. the secret starts life here: it is
//! revealed against the locally stored hash, published for the peer
//! chain to consume, and the consumption is recorded so the same
//! preimage can never also unlock a local escrow

use serde::{Deserialize, Serialize};
use tracing::info;

use htlc_escrow::hashlock;
use htlc_escrow::types::{Address, H256};

use crate::coordinator::{
    Coordinator, CoordinatorEvent, CoordinationStatus, CrossChainSwapCompleted,
    LocalSecretRevealed, OutboundInitiated,
};
use crate::error::{CoordinatorError, Result};

/// one locally initiated swap awaiting completion on the peer chain
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboundSwap {
    pub order_hash: H256,
    pub secret_hash: H256,
    pub maker: Address,
    pub taker: Address,
    pub token: H256,
    pub amount: u64,
    pub safety_deposit: u64,
    /// native value escrowed at initiation
    pub deposited_value: u64,
    pub foreign_escrow_id: Option<H256>,
    pub revealed_secret: Option<Vec<u8>>,
    pub active: bool,
    pub initiated_at: u64,
}

impl Coordinator {
    pub fn outbound_swap(&self, order_hash: H256) -> Option<&OutboundSwap> {
        self.outbound.get(&order_hash)
    }

    /// record a local order whose counter-leg will be escrowed on the
    /// peer chain
    #[allow(clippy::too_many_arguments)]
    pub fn initiate_local_to_foreign_swap(
        &mut self,
        order_hash: H256,
        secret_hash: H256,
        maker: Address,
        taker: Address,
        token: H256,
        amount: u64,
        safety_deposit: u64,
        value: u64,
        now: u64,
    ) -> Result<()> {
        if order_hash.is_zero() || secret_hash.is_zero() {
            return Err(CoordinatorError::InvalidIdentifier);
        }
        if value < safety_deposit {
            return Err(CoordinatorError::InsufficientDeposit {
                need: safety_deposit,
                got: value,
            });
        }
        if self.outbound.contains_key(&order_hash) {
            return Err(CoordinatorError::DuplicateOrder);
        }

        self.outbound.insert(
            order_hash,
            OutboundSwap {
                order_hash,
                secret_hash,
                maker,
                taker,
                token,
                amount,
                safety_deposit,
                deposited_value: value,
                foreign_escrow_id: None,
                revealed_secret: None,
                active: true,
                initiated_at: now,
            },
        );
        self.coordination_status
            .insert(order_hash, CoordinationStatus::ForeignEscrowInitiated);

        self.events
            .push(CoordinatorEvent::OutboundInitiated(OutboundInitiated {
                order_hash,
                secret_hash,
                amount,
            }));
        info!(order = %order_hash, amount, "outbound swap initiated");
        Ok(())
    }

    /// bind the local order to the escrow the resolver deployed on the
    /// peer chain
    pub fn link_local_order_to_foreign_escrow(
        &mut self,
        order_hash: H256,
        foreign_escrow_id: H256,
    ) -> Result<()> {
        if foreign_escrow_id.is_zero() {
            return Err(CoordinatorError::InvalidIdentifier);
        }
        let swap = self
            .outbound
            .get(&order_hash)
            .ok_or(CoordinatorError::UnknownOrder)?;
        if !swap.active {
            return Err(CoordinatorError::SwapInactive);
        }

        self.mapping.insert(foreign_escrow_id, order_hash)?;
        if let Some(swap) = self.outbound.get_mut(&order_hash) {
            swap.foreign_escrow_id = Some(foreign_escrow_id);
        }
        self.coordination_status
            .insert(foreign_escrow_id, CoordinationStatus::MappingRegistered);
        Ok(())
    }

    /// check the preimage against the stored hash and publish it for
    /// the peer chain
    pub fn reveal_local_secret(&mut self, order_hash: H256, preimage: &[u8]) -> Result<()> {
        let swap = self
            .outbound
            .get(&order_hash)
            .ok_or(CoordinatorError::UnknownOrder)?;
        if !swap.active {
            return Err(CoordinatorError::SwapInactive);
        }
        if !hashlock::verify_hash(&swap.secret_hash, preimage) {
            return Err(CoordinatorError::InvalidSecret);
        }
        if self.is_consumed(preimage) {
            return Err(CoordinatorError::SecretAlreadyUsed);
        }

        let status_key = swap.foreign_escrow_id.unwrap_or(order_hash);
        if let Some(swap) = self.outbound.get_mut(&order_hash) {
            swap.revealed_secret = Some(preimage.to_vec());
        }
        self.coordination_status
            .insert(status_key, CoordinationStatus::SecretAvailableCrossChain);

        self.events
            .push(CoordinatorEvent::LocalSecretRevealed(LocalSecretRevealed {
                order_hash,
                secret: preimage.to_vec(),
            }));
        info!(order = %order_hash, "local secret revealed for foreign consumption");
        Ok(())
    }

    /// record that the peer chain consumed the revealed secret; closes
    /// the swap
    pub fn complete_foreign_withdrawal_from_local_secret(
        &mut self,
        order_hash: H256,
        foreign_escrow_id: H256,
    ) -> Result<()> {
        let swap = self
            .outbound
            .get(&order_hash)
            .ok_or(CoordinatorError::UnknownOrder)?;
        if !swap.active {
            return Err(CoordinatorError::SwapInactive);
        }
        if swap.foreign_escrow_id != Some(foreign_escrow_id) {
            return Err(CoordinatorError::UnknownForeignEscrow);
        }
        let secret = swap
            .revealed_secret
            .clone()
            .ok_or(CoordinatorError::SecretNotRevealed)?;
        let amount = swap.amount;
        if self.is_consumed(&secret) {
            return Err(CoordinatorError::SecretAlreadyUsed);
        }

        self.secret_used_on_foreign.insert(secret);
        if let Some(swap) = self.outbound.get_mut(&order_hash) {
            swap.active = false;
        }
        self.coordination_status.insert(
            foreign_escrow_id,
            CoordinationStatus::BidirectionalCompleted,
        );

        let chain = self.chain();
        self.events.push(CoordinatorEvent::CrossChainSwapCompleted(
            CrossChainSwapCompleted {
                order_hash,
                src_chain: chain,
                dst_chain: chain.peer(),
                src_amount: amount,
                dst_amount: amount,
            },
        ));
        info!(
            order = %order_hash,
            foreign_escrow = %foreign_escrow_id,
            "outbound swap completed on foreign chain"
        );
        Ok(())
    }
}
