//! end-to-end swap scenarios across both chains
//!
//! both ledgers are simulated in-process: a factory per side, a
//! coordinator per chain, and a logical clock advanced by hand

use htlc_escrow::escrow::{EscrowState, Immutables};
use htlc_escrow::events::EscrowEvent;
use htlc_escrow::hashlock::compute_hash_lock;
use htlc_escrow::timelock::{Side, TimeLocks};
use htlc_escrow::types::{Address, Balance, H256, Token};
use htlc_escrow::EscrowFactory;
use htlc_escrow::EscrowError;
use swap_coordinator::{Chain, Coordinator, CoordinatorError, CoordinatorEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SuiCoin;

impl Token for SuiCoin {
    const TAG: H256 = H256([0x51; 32]);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct EthToken;

impl Token for EthToken {
    const TAG: H256 = H256([0xe7; 32]);
}

const SECRET: &[u8] = b"working_real_1754151588608";
const AMOUNT: u64 = 20_000_000;
const SAFETY: u64 = 1_000;
const T0: u64 = 1_754_151_588;

fn maker() -> Address {
    Address::from_raw([0xaa; 32])
}

fn resolver() -> Address {
    Address::from_raw([0xbb; 32])
}

fn locks() -> TimeLocks {
    TimeLocks::new(15, 60, 120, 180, 15, 60, 120).unwrap()
}

fn immutables(token_type: H256, order_hash: H256, foreign_order_hash: H256) -> Immutables {
    Immutables {
        order_hash,
        hash_lock: compute_hash_lock(SECRET),
        maker: maker(),
        taker: resolver(),
        token_type,
        amount: AMOUNT,
        safety_deposit: SAFETY,
        time_locks: locks(),
        foreign_order_hash,
    }
}

fn funded_escrow<T: Token>(factory: &mut EscrowFactory<T>, im: Immutables, now: u64) -> H256 {
    let id = factory.create_escrow(im, resolver(), now).unwrap();
    let mut principal = Balance::new(AMOUNT);
    let mut safety = Balance::new(SAFETY);
    factory
        .escrow_mut(id)
        .unwrap()
        .deposit(resolver(), &mut principal, &mut safety)
        .unwrap();
    id
}

#[test]
fn happy_path_sui_to_eth() {
    let order_hash_e = H256([0x0e; 32]);
    let order_hash_s = H256([0x05; 32]);

    // source leg on sui, funded by the resolver
    let mut sui_factory: EscrowFactory<SuiCoin> = EscrowFactory::new(H256([1u8; 32]), Side::Src);
    let escrow_s = funded_escrow(
        &mut sui_factory,
        immutables(SuiCoin::TAG, order_hash_s, order_hash_e),
        T0,
    );

    // destination leg on eth
    let mut eth_factory: EscrowFactory<EthToken> = EscrowFactory::new(H256([2u8; 32]), Side::Dst);
    let escrow_e = funded_escrow(
        &mut eth_factory,
        immutables(EthToken::TAG, order_hash_e, order_hash_s),
        T0,
    );

    // the taker withdraws on sui in the private window, revealing the
    // preimage on-chain
    let payout = sui_factory
        .escrow_mut(escrow_s)
        .unwrap()
        .withdraw(resolver(), SECRET, T0 + 20)
        .unwrap();
    assert_eq!(payout.principal.value(), AMOUNT);
    assert_eq!(payout.principal_to, maker());
    assert_eq!(payout.safety_to, resolver());

    // an observer lifts the secret out of the withdrawal event
    let revealed = sui_factory
        .escrow(escrow_s)
        .unwrap()
        .events()
        .iter()
        .find_map(|e| match e {
            EscrowEvent::Withdrawn(w) => Some(w.secret.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(revealed, SECRET.to_vec());

    // ... and relays it to the coordinator on eth
    let relayer = Address::from_raw([0xcc; 32]);
    let mut eth_coordinator = Coordinator::new(Address::from_raw([0x01; 32]), Chain::Eth);
    eth_coordinator
        .coordinate_secret_from_foreign(escrow_s, &revealed, order_hash_e, relayer, T0 + 25)
        .unwrap();

    let entry = eth_coordinator.get_coordinated_secret(escrow_s).unwrap();
    assert!(entry.available);

    // the counter-party unlocks the eth leg through the coordinator
    let payout = eth_coordinator
        .withdraw_with_coordinated_secret(
            eth_factory.escrow_mut(escrow_e).unwrap(),
            escrow_s,
            resolver(),
            T0 + 30,
        )
        .unwrap();
    assert_eq!(payout.principal.value(), AMOUNT);
    assert_eq!(payout.principal_to, resolver());
    assert_eq!(
        eth_factory.escrow(escrow_e).unwrap().state(),
        EscrowState::Withdrawn
    );

    // the completion event names the swap direction
    assert!(eth_coordinator.events().iter().any(|e| matches!(
        e,
        CoordinatorEvent::CrossChainSwapCompleted(c)
            if c.order_hash == order_hash_e
                && c.src_chain == Chain::Sui
                && c.dst_chain == Chain::Eth
                && c.src_amount == AMOUNT
    )));

    // the preimage is spent on this chain for good
    assert!(!eth_coordinator
        .get_coordinated_secret(escrow_s)
        .unwrap()
        .available);
}

#[test]
fn coordinated_secret_is_one_shot() {
    let mut eth_factory: EscrowFactory<EthToken> = EscrowFactory::new(H256([2u8; 32]), Side::Dst);
    let order_hash_e = H256([0x0e; 32]);
    let escrow_s = H256([0x51; 32]);

    let first = funded_escrow(
        &mut eth_factory,
        immutables(EthToken::TAG, order_hash_e, H256([0x05; 32])),
        T0,
    );
    let second = funded_escrow(
        &mut eth_factory,
        immutables(EthToken::TAG, order_hash_e, H256([0x05; 32])),
        T0 + 1,
    );

    let mut coordinator = Coordinator::new(Address::from_raw([0x01; 32]), Chain::Eth);
    coordinator
        .coordinate_secret_from_foreign(
            escrow_s,
            SECRET,
            order_hash_e,
            Address::from_raw([0xcc; 32]),
            T0 + 25,
        )
        .unwrap();

    coordinator
        .withdraw_with_coordinated_secret(
            eth_factory.escrow_mut(first).unwrap(),
            escrow_s,
            resolver(),
            T0 + 30,
        )
        .unwrap();

    // the same coordinated secret cannot unlock a second escrow
    assert_eq!(
        coordinator
            .withdraw_with_coordinated_secret(
                eth_factory.escrow_mut(second).unwrap(),
                escrow_s,
                resolver(),
                T0 + 31,
            )
            .err(),
        Some(CoordinatorError::SecretAlreadyUsed)
    );
    assert_eq!(
        eth_factory.escrow(second).unwrap().state(),
        EscrowState::Funded
    );
}

#[test]
fn failed_withdrawal_leaves_coordinator_clean() {
    let mut eth_factory: EscrowFactory<EthToken> = EscrowFactory::new(H256([2u8; 32]), Side::Dst);
    let order_hash_e = H256([0x0e; 32]);
    let escrow_s = H256([0x51; 32]);
    let escrow_e = funded_escrow(
        &mut eth_factory,
        immutables(EthToken::TAG, order_hash_e, H256([0x05; 32])),
        T0,
    );

    let mut coordinator = Coordinator::new(Address::from_raw([0x01; 32]), Chain::Eth);
    coordinator
        .coordinate_secret_from_foreign(
            escrow_s,
            SECRET,
            order_hash_e,
            Address::from_raw([0xcc; 32]),
            T0 + 5,
        )
        .unwrap();

    // too early: the escrow rejects, the secret stays available
    let err = coordinator.withdraw_with_coordinated_secret(
        eth_factory.escrow_mut(escrow_e).unwrap(),
        escrow_s,
        resolver(),
        T0 + 5,
    );
    assert_eq!(
        err.err(),
        Some(CoordinatorError::Escrow(EscrowError::TimeLockNotExpired))
    );
    assert!(coordinator
        .get_coordinated_secret(escrow_s)
        .unwrap()
        .available);

    // once the window opens the same secret goes through
    coordinator
        .withdraw_with_coordinated_secret(
            eth_factory.escrow_mut(escrow_e).unwrap(),
            escrow_s,
            resolver(),
            T0 + 20,
        )
        .unwrap();
}

#[test]
fn cancellation_path_returns_principal_to_maker() {
    let mut sui_factory: EscrowFactory<SuiCoin> = EscrowFactory::new(H256([1u8; 32]), Side::Src);
    let escrow_s = funded_escrow(
        &mut sui_factory,
        immutables(SuiCoin::TAG, H256([0x05; 32]), H256([0x0e; 32])),
        T0,
    );
    let stranger = Address::from_raw([0xdd; 32]);

    // no secret ever surfaces; a third party reaps the escrow once the
    // public cancellation window opens
    let escrow = sui_factory.escrow_mut(escrow_s).unwrap();
    assert_eq!(
        escrow.cancel(stranger, T0 + 150).err(),
        Some(EscrowError::TimeLockNotExpired)
    );

    let payout = escrow.cancel(stranger, T0 + 180).unwrap();
    assert_eq!(payout.principal.value(), AMOUNT);
    assert_eq!(payout.principal_to, maker());
    // the caller keeps the safety deposit for driving the terminal op
    assert_eq!(payout.safety.value(), SAFETY);
    assert_eq!(payout.safety_to, stranger);
    assert_eq!(escrow.state(), EscrowState::Cancelled);
}

#[test]
fn preimage_never_crosses_directions() {
    // a secret spent through the outbound flow can never also unlock a
    // local escrow through the inbound flow
    let secret = b"bidirectional_secret_42";
    let order_hash = H256([0x21; 32]);
    let foreign_escrow = H256([0x22; 32]);

    let mut coordinator = Coordinator::new(Address::from_raw([0x01; 32]), Chain::Eth);
    coordinator
        .initiate_local_to_foreign_swap(
            order_hash,
            compute_hash_lock(secret),
            maker(),
            resolver(),
            EthToken::TAG,
            AMOUNT,
            SAFETY,
            SAFETY,
            T0,
        )
        .unwrap();
    coordinator
        .link_local_order_to_foreign_escrow(order_hash, foreign_escrow)
        .unwrap();
    coordinator.reveal_local_secret(order_hash, secret).unwrap();
    coordinator
        .complete_foreign_withdrawal_from_local_secret(order_hash, foreign_escrow)
        .unwrap();

    // the peer revealed the same preimage back to us; coordination
    // stores it, but consumption is blocked
    let other_foreign = H256([0x23; 32]);
    coordinator
        .coordinate_secret_from_foreign(
            other_foreign,
            secret,
            H256([0x24; 32]),
            Address::from_raw([0xcc; 32]),
            T0 + 100,
        )
        .unwrap();
    assert!(!coordinator
        .get_coordinated_secret(other_foreign)
        .unwrap()
        .available);

    let mut eth_factory: EscrowFactory<EthToken> = EscrowFactory::new(H256([2u8; 32]), Side::Dst);
    let mut im = immutables(EthToken::TAG, H256([0x24; 32]), H256([0x25; 32]));
    im.hash_lock = compute_hash_lock(secret);
    let escrow_e = eth_factory.create_escrow(im, resolver(), T0).unwrap();
    let mut principal = Balance::new(AMOUNT);
    let mut safety = Balance::new(SAFETY);
    eth_factory
        .escrow_mut(escrow_e)
        .unwrap()
        .deposit(resolver(), &mut principal, &mut safety)
        .unwrap();

    assert_eq!(
        coordinator
            .withdraw_with_coordinated_secret(
                eth_factory.escrow_mut(escrow_e).unwrap(),
                other_foreign,
                resolver(),
                T0 + 200,
            )
            .err(),
        Some(CoordinatorError::SecretAlreadyUsed)
    );
}

#[test]
fn double_coordination_rejected_across_relayers() {
    let mut coordinator = Coordinator::new(Address::from_raw([0x01; 32]), Chain::Eth);
    coordinator
        .coordinate_secret_from_foreign(
            H256([0x51; 32]),
            SECRET,
            H256([0x0e; 32]),
            Address::from_raw([0xcc; 32]),
            T0,
        )
        .unwrap();

    // a different relayer, a different escrow id, the same preimage
    assert_eq!(
        coordinator
            .coordinate_secret_from_foreign(
                H256([0x52; 32]),
                SECRET,
                H256([0x0f; 32]),
                Address::from_raw([0xdd; 32]),
                T0 + 1,
            )
            .err(),
        Some(CoordinatorError::SecretAlreadyCoordinated)
    );
}
