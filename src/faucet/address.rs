//! Destination address classification.
//!
//! Prefix matching only: no length, checksum or on-chain checks.

use crate::faucet::error::AddressRejection;
use crate::faucet::types::AddressKind;

const TRANSPARENT_TESTNET_PREFIX: &str = "tm";
const SAPLING_TESTNET_PREFIX: &str = "ztestsapling";

/// Classify an address by its textual prefix, ignoring surrounding
/// whitespace.
pub fn classify(address: &str) -> AddressKind {
    let address = address.trim();
    if address.starts_with(SAPLING_TESTNET_PREFIX) {
        AddressKind::ShieldedTestnetSapling
    } else if address.starts_with(TRANSPARENT_TESTNET_PREFIX) {
        AddressKind::TransparentTestnet
    } else {
        AddressKind::Unknown
    }
}

/// Accept an address as a claim destination.
///
/// Accepted exactly when [`classify`] reports a known kind.
pub fn validate_claim_address(address: &str) -> Result<AddressKind, AddressRejection> {
    if address.trim().is_empty() {
        return Err(AddressRejection::Empty);
    }
    match classify(address) {
        AddressKind::Unknown => Err(AddressRejection::Unsupported),
        kind => Ok(kind),
    }
}
