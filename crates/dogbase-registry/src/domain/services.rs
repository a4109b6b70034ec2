//! # Domain Services
//!
//! Pure hashing helpers. Deterministic, no side effects.

use crate::domain::value_objects::{Address, Hash};
use sha3::{Digest, Keccak256};

/// Keccak-256 hash.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let result = Keccak256::digest(data);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    Hash::new(hash)
}

/// Derives an address from a label: the last 20 bytes of its Keccak-256 hash.
#[must_use]
pub fn address_from_label(label: &str) -> Address {
    let hash = keccak256(label.as_bytes());
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&hash.as_bytes()[12..32]);
    Address::new(addr)
}

/// Default custody account of a registry deployment.
#[must_use]
pub fn default_custody_address() -> Address {
    address_from_label("dogbase.custody")
}
