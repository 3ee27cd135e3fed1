//! deterministic address mapping between the two ledgers
//!
//! a one-way keccak view in each direction; the checkpoint and
//! inclusion verification carry the security, these mappings only need
//! to be deterministic

use sha3::{Digest, Keccak256};

use crate::Hash;

/// domain separator for the eth -> sui direction
pub const BRIDGE_DOMAIN: &[u8] = b"sui_bridge_v1";

/// last 20 bytes of keccak-256 of the 32-byte sui address
pub fn sui_to_eth_address(sui: &Hash) -> [u8; 20] {
    let digest: Hash = Keccak256::digest(sui).into();
    let mut eth = [0u8; 20];
    eth.copy_from_slice(&digest[12..]);
    eth
}

/// keccak-256 of the 20-byte eth address concatenated with the bridge
/// domain tag
pub fn eth_to_sui_address(eth: &[u8; 20]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(eth);
    hasher.update(BRIDGE_DOMAIN);
    hasher.finalize().into()
}
