//! per-swap escrow instance
//!
//! one escrow holds the deposited principal and the safety deposit for
//! one leg of a swap and walks a single state machine:
//!
//! ```text
//!           deposit              withdraw(secret)
//! Created ──────────► Funded ─────────────────────► Withdrawn
//!                       │        cancel(timeout)
//!                       └────────────────────────► Cancelled
//! ```
//!
//! the host ledger serialises mutation of a single escrow, so the code
//! here is written single-threaded per instance

use serde::{Deserialize, Serialize};

use crate::error::{EscrowError, Result};
use crate::events::{Cancelled, Deposited, EscrowCreated, EscrowEvent, Withdrawn};
use crate::hashlock;
use crate::timelock::{Phase, Side, TimeLocks};
use crate::types::{Address, Balance, H256, Native, Token};

/// parameters fixed for the life of an escrow
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Immutables {
    pub order_hash: H256,
    pub hash_lock: H256,
    pub maker: Address,
    pub taker: Address,
    pub token_type: H256,
    pub amount: u64,
    pub safety_deposit: u64,
    pub time_locks: TimeLocks,
    /// order identifier on the peer chain
    pub foreign_order_hash: H256,
}

impl Immutables {
    /// reject parameters that could never produce a claimable escrow
    pub fn validate(&self) -> Result<()> {
        if self.amount == 0 {
            return Err(EscrowError::InvalidImmutables("zero amount"));
        }
        if self.hash_lock.is_zero() {
            return Err(EscrowError::InvalidImmutables("zero hash lock"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum EscrowState {
    Created,
    Funded,
    Withdrawn,
    Cancelled,
}

/// funds released by a terminal operation, with their recipients
///
/// the caller (host ledger glue) performs the actual transfers; naming
/// both recipients here keeps value conservation checkable
#[derive(Debug, PartialEq, Eq)]
pub struct Payout<T: Token> {
    pub principal: Balance<T>,
    pub principal_to: Address,
    pub safety: Balance<Native>,
    pub safety_to: Address,
}

/// a shared escrow object; access is gated by the immutables, not by an
/// owning account
pub struct Escrow<T: Token> {
    id: H256,
    immutables: Immutables,
    side: Side,
    state: EscrowState,
    deposited: Balance<T>,
    safety: Balance<Native>,
    t0: u64,
    events: Vec<EscrowEvent>,
}

impl<T: Token> Escrow<T> {
    pub(crate) fn new(id: H256, immutables: Immutables, side: Side, t0: u64) -> Result<Self> {
        immutables.validate()?;
        if id.is_zero() {
            return Err(EscrowError::InvalidImmutables("zero escrow id"));
        }
        if immutables.token_type != T::TAG {
            return Err(EscrowError::InvalidImmutables("token type mismatch"));
        }

        let created = EscrowCreated {
            escrow_id: id,
            maker: immutables.maker,
            taker: immutables.taker,
            amount: immutables.amount,
            hash_lock: immutables.hash_lock,
            foreign_order_hash: immutables.foreign_order_hash,
        };

        Ok(Self {
            id,
            immutables,
            side,
            state: EscrowState::Created,
            deposited: Balance::zero(),
            safety: Balance::zero(),
            t0,
            events: vec![created.into()],
        })
    }

    pub fn id(&self) -> H256 {
        self.id
    }

    pub fn immutables(&self) -> &Immutables {
        &self.immutables
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn state(&self) -> EscrowState {
        self.state
    }

    pub fn t0(&self) -> u64 {
        self.t0
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, EscrowState::Withdrawn | EscrowState::Cancelled)
    }

    pub fn deposited_value(&self) -> u64 {
        self.deposited.value()
    }

    pub fn safety_value(&self) -> u64 {
        self.safety.value()
    }

    pub fn events(&self) -> &[EscrowEvent] {
        &self.events
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_completed() {
            return Err(EscrowError::EscrowCompleted);
        }
        Ok(())
    }

    /// fund the escrow; taker only, exactly once
    ///
    /// pulls exactly `amount` and `safety_deposit` out of the caller's
    /// purses; on any error nothing moves
    pub fn deposit(
        &mut self,
        caller: Address,
        principal: &mut Balance<T>,
        safety: &mut Balance<Native>,
    ) -> Result<()> {
        self.ensure_live()?;
        if self.state == EscrowState::Funded {
            return Err(EscrowError::AlreadyFunded);
        }
        if caller != self.immutables.taker {
            return Err(EscrowError::Unauthorized);
        }
        if principal.value() < self.immutables.amount {
            return Err(EscrowError::DepositMismatch {
                expected: self.immutables.amount,
                got: principal.value(),
            });
        }
        if safety.value() < self.immutables.safety_deposit {
            return Err(EscrowError::DepositMismatch {
                expected: self.immutables.safety_deposit,
                got: safety.value(),
            });
        }

        // both splits are checked above, neither can fail now
        if let Some(p) = principal.split(self.immutables.amount) {
            self.deposited.join(p);
        }
        if let Some(s) = safety.split(self.immutables.safety_deposit) {
            self.safety.join(s);
        }
        self.state = EscrowState::Funded;

        self.events.push(
            Deposited {
                escrow_id: self.id,
                depositor: caller,
                amount: self.immutables.amount,
                safety_deposit: self.immutables.safety_deposit,
            }
            .into(),
        );
        Ok(())
    }

    /// release the escrow against the preimage of its hash lock
    ///
    /// the taker may withdraw from the private window on; anyone else
    /// must wait for the public window. crossing into a cancellation
    /// window never closes withdrawal
    pub fn withdraw(&mut self, caller: Address, secret: &[u8], now: u64) -> Result<Payout<T>> {
        self.ensure_live()?;
        if self.state == EscrowState::Created {
            return Err(EscrowError::NotFunded);
        }

        let phase = self.immutables.time_locks.phase_at(now, self.t0, self.side);
        let required = match (self.side, caller == self.immutables.taker) {
            (Side::Src, true) => Phase::SrcPrivateWithdraw,
            (Side::Src, false) => Phase::SrcPublicWithdraw,
            (Side::Dst, true) => Phase::DstPrivateWithdraw,
            (Side::Dst, false) => Phase::DstPublicWithdraw,
        };
        if phase < required {
            return Err(EscrowError::TimeLockNotExpired);
        }

        if !hashlock::verify_hash(&self.immutables.hash_lock, secret) {
            return Err(EscrowError::InvalidSecret);
        }

        self.state = EscrowState::Withdrawn;
        let principal = self.deposited.take();
        let safety = self.safety.take();
        let principal_to = match self.side {
            Side::Src => self.immutables.maker,
            Side::Dst => self.immutables.taker,
        };

        self.events.push(
            Withdrawn {
                escrow_id: self.id,
                secret: secret.to_vec(),
                to: principal_to,
                amount: principal.value(),
            }
            .into(),
        );

        Ok(Payout {
            principal,
            principal_to,
            safety,
            safety_to: caller,
        })
    }

    /// unwind the escrow after its cancellation window opens
    ///
    /// the destination schedule has no public cancellation offset, so on
    /// that side only the taker may cancel
    pub fn cancel(&mut self, caller: Address, now: u64) -> Result<Payout<T>> {
        self.ensure_live()?;
        if self.state == EscrowState::Created {
            return Err(EscrowError::NotFunded);
        }

        let phase = self.immutables.time_locks.phase_at(now, self.t0, self.side);
        let required = match (self.side, caller == self.immutables.taker) {
            (Side::Src, true) => Phase::SrcCancel,
            (Side::Src, false) => Phase::SrcPublicCancel,
            (Side::Dst, true) => Phase::DstCancel,
            (Side::Dst, false) => return Err(EscrowError::Unauthorized),
        };
        if phase < required {
            return Err(EscrowError::TimeLockNotExpired);
        }

        self.state = EscrowState::Cancelled;
        let principal = self.deposited.take();
        let safety = self.safety.take();
        let principal_to = match self.side {
            Side::Src => self.immutables.maker,
            Side::Dst => self.immutables.taker,
        };

        self.events.push(
            Cancelled {
                escrow_id: self.id,
                to: principal_to,
                amount: principal.value(),
            }
            .into(),
        );

        Ok(Payout {
            principal,
            principal_to,
            safety,
            safety_to: caller,
        })
    }
}
