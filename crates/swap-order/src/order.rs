//! canonical order encoding and hashing
//!
//! the order hash is keccak-256 over a domain tag followed by every
//! field in declaration order, amounts little-endian; both chains must
//! derive the identical 32 bytes

use serde::{Deserialize, Serialize};

use htlc_escrow::hashlock::keccak256;
use htlc_escrow::types::{Address, H256};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub salt: H256,
    pub maker: Address,
    pub receiver: Address,
    pub maker_asset: H256,
    pub taker_asset: H256,
    pub making_amount: u64,
    pub taking_amount: u64,
    pub maker_traits: H256,
}

impl Order {
    /// canonical encoding bytes, the preimage of the order hash
    fn encode(&self, data: &mut Vec<u8>) {
        data.extend_from_slice(&self.salt.0);
        data.extend_from_slice(&self.maker.0);
        data.extend_from_slice(&self.receiver.0);
        data.extend_from_slice(&self.maker_asset.0);
        data.extend_from_slice(&self.taker_asset.0);
        data.extend_from_slice(&self.making_amount.to_le_bytes());
        data.extend_from_slice(&self.taking_amount.to_le_bytes());
        data.extend_from_slice(&self.maker_traits.0);
    }

    pub fn hash(&self) -> H256 {
        let mut data = Vec::with_capacity(13 + 32 * 6 + 8 * 2);
        data.extend_from_slice(b"swap-order-v1");
        self.encode(&mut data);
        keccak256(&data)
    }
}

/// an order whose fill is split across a merkle tree of per-fragment
/// secrets, each leaf unlocking an independent slice
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialFillOrder {
    pub order: Order,
    pub merkle_root: H256,
    /// accumulated fill in basis points, starts at zero
    pub fill_percentage: u64,
    /// leaf index of the most recent fill
    pub secret_index: u64,
    pub allow_partial_fills: bool,
    pub total_secrets: u64,
}

impl PartialFillOrder {
    pub fn new(
        order: Order,
        merkle_root: H256,
        total_secrets: u64,
        allow_partial_fills: bool,
    ) -> Self {
        Self {
            order,
            merkle_root,
            fill_percentage: 0,
            secret_index: 0,
            allow_partial_fills,
            total_secrets,
        }
    }

    pub fn hash(&self) -> H256 {
        let mut data = Vec::with_capacity(18 + 32 * 7 + 8 * 3);
        data.extend_from_slice(b"swap-order-v1/fill");
        self.order.encode(&mut data);
        data.extend_from_slice(&self.merkle_root.0);
        data.extend_from_slice(&self.total_secrets.to_le_bytes());
        keccak256(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn mock_order() -> Order {
        Order {
            salt: H256([1u8; 32]),
            maker: Address::from_raw([0xaa; 32]),
            receiver: Address::from_raw([0xab; 32]),
            maker_asset: H256([2u8; 32]),
            taker_asset: H256([3u8; 32]),
            making_amount: 1_000_000,
            taking_amount: 2_000_000,
            maker_traits: H256::zero(),
        }
    }

    #[test]
    fn test_order_hash_deterministic() {
        assert_eq!(mock_order().hash(), mock_order().hash());
    }

    #[test]
    fn test_order_hash_field_sensitivity() {
        let base = mock_order().hash();

        let mut o = mock_order();
        o.salt = H256([9u8; 32]);
        assert_ne!(o.hash(), base);

        let mut o = mock_order();
        o.making_amount += 1;
        assert_ne!(o.hash(), base);

        let mut o = mock_order();
        o.receiver = Address::from_raw([0xff; 32]);
        assert_ne!(o.hash(), base);
    }

    #[test]
    fn test_partial_fill_hash_covers_tree() {
        let a = PartialFillOrder::new(mock_order(), H256([4u8; 32]), 4, true);
        let mut b = a.clone();
        b.merkle_root = H256([5u8; 32]);
        assert_ne!(a.hash(), b.hash());

        let mut c = a.clone();
        c.total_secrets = 8;
        assert_ne!(a.hash(), c.hash());

        // plain and partial-fill orders never collide
        assert_ne!(a.hash(), a.order.hash());
    }

    #[test]
    fn test_fill_state_not_hashed() {
        // the hash identifies the order, not its fill progress
        let a = PartialFillOrder::new(mock_order(), H256([4u8; 32]), 4, true);
        let mut b = a.clone();
        b.fill_percentage = 2_500;
        b.secret_index = 3;
        assert_eq!(a.hash(), b.hash());
    }
}
