//! resolver: the identity authorised to deploy and fund escrows
//!
//! a thin policy layer over the factory; only its owner may deploy or
//! fund, while withdrawal stays open to anyone holding the secret

use tracing::info;

use crate::error::{EscrowError, Result};
use crate::escrow::Immutables;
use crate::events::{OwnershipTransferred, ResolverEvent, SrcEscrowDeployed};
use crate::factory::EscrowFactory;
use crate::types::{Address, Balance, H256, Native, Token};

pub struct Resolver {
    id: H256,
    owner: Address,
    events: Vec<ResolverEvent>,
}

impl Resolver {
    pub fn new(id: H256, owner: Address) -> Self {
        Self {
            id,
            owner,
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> H256 {
        self.id
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn events(&self) -> &[ResolverEvent] {
        &self.events
    }

    fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(EscrowError::Unauthorized);
        }
        Ok(())
    }

    /// the only mutating operation on the resolver itself
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        let previous_owner = self.owner;
        self.owner = new_owner;
        self.events
            .push(ResolverEvent::OwnershipTransferred(OwnershipTransferred {
                resolver_id: self.id,
                previous_owner,
                new_owner,
            }));
        info!(resolver = %self.id, ?new_owner, "resolver ownership transferred");
        Ok(())
    }

    /// deposit preconditions, checked before the escrow exists so the
    /// combined deploy stays all-or-nothing
    fn check_deposit<T: Token>(
        immutables: &Immutables,
        principal: &Balance<T>,
        safety: &Balance<Native>,
        caller: Address,
    ) -> Result<()> {
        if caller != immutables.taker {
            return Err(EscrowError::Unauthorized);
        }
        if principal.value() < immutables.amount {
            return Err(EscrowError::DepositMismatch {
                expected: immutables.amount,
                got: principal.value(),
            });
        }
        if safety.value() < immutables.safety_deposit {
            return Err(EscrowError::DepositMismatch {
                expected: immutables.safety_deposit,
                got: safety.value(),
            });
        }
        Ok(())
    }

    /// create and fund a source-side escrow in one step
    pub fn deploy_src_with_deposit<T: Token>(
        &mut self,
        factory: &mut EscrowFactory<T>,
        immutables: Immutables,
        principal: &mut Balance<T>,
        safety: &mut Balance<Native>,
        caller: Address,
        now: u64,
    ) -> Result<H256> {
        self.ensure_owner(caller)?;
        Self::check_deposit(&immutables, principal, safety, caller)?;

        let foreign_order_hash = immutables.foreign_order_hash;
        let escrow_id = factory.create_escrow(immutables.clone(), caller, now)?;
        factory
            .escrow_mut(escrow_id)
            .ok_or(EscrowError::UnknownEscrow)?
            .deposit(caller, principal, safety)?;

        self.events
            .push(ResolverEvent::SrcEscrowDeployed(SrcEscrowDeployed {
                resolver_id: self.id,
                escrow_id,
                immutables,
                deployer: caller,
                foreign_order_hash,
            }));
        Ok(escrow_id)
    }

    /// create and fund a destination-side escrow in one step
    pub fn deploy_dst_with_deposit<T: Token>(
        &mut self,
        factory: &mut EscrowFactory<T>,
        immutables: Immutables,
        principal: &mut Balance<T>,
        safety: &mut Balance<Native>,
        caller: Address,
        now: u64,
    ) -> Result<H256> {
        self.ensure_owner(caller)?;
        Self::check_deposit(&immutables, principal, safety, caller)?;
        let escrow_id = factory.create_escrow(immutables, caller, now)?;
        factory
            .escrow_mut(escrow_id)
            .ok_or(EscrowError::UnknownEscrow)?
            .deposit(caller, principal, safety)?;
        Ok(escrow_id)
    }

    /// fund an existing escrow
    pub fn deposit_to_escrow<T: Token>(
        &mut self,
        factory: &mut EscrowFactory<T>,
        escrow_id: H256,
        principal: &mut Balance<T>,
        safety: &mut Balance<Native>,
        caller: Address,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        factory
            .escrow_mut(escrow_id)
            .ok_or(EscrowError::UnknownEscrow)?
            .deposit(caller, principal, safety)
    }
}
