//! # Domain Services
//!
//! Pure helper functions for the router: keccak-256 hashing and the
//! derivation of the well-known interop storage slots.
//!
//! No I/O, no async code, deterministic only.

use crate::domain::value_objects::{Address, SlotKey, SlotValue, U256};
use sha3::{Digest, Keccak256};

// =============================================================================
// KECCAK256 UTILITY
// =============================================================================

/// Computes the keccak-256 hash of `data`.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

// =============================================================================
// WELL-KNOWN SLOT DERIVATION
// =============================================================================

/// Derives a well-known storage slot from a label.
///
/// Slot = keccak256(label) - 1, the conventional scheme for picking slots
/// that no compiler-assigned storage layout can collide with. External
/// tooling that knows the label can locate the slot without any ABI.
#[must_use]
pub fn derive_slot(label: &str) -> SlotKey {
    let hash = keccak256(label.as_bytes());
    let value = U256::from_big_endian(&hash);
    SlotKey::from_u256(value.overflowing_sub(U256::one()).0)
}

/// The fixed, environment-standard storage locations maintained for
/// interoperability.
pub mod well_known {
    use super::{derive_slot, SlotKey};

    /// Slot holding the admin identity, written once at deployment.
    #[must_use]
    pub fn admin_slot() -> SlotKey {
        derive_slot("router.admin")
    }

    /// Slot mirroring the current default's implementation target.
    ///
    /// Updated transactionally with every default change so external
    /// tooling can answer "what does this address forward to by default"
    /// without calling into the router.
    #[must_use]
    pub fn implementation_slot() -> SlotKey {
        derive_slot("router.implementation")
    }

    /// Slot tracking the router's held balance (credited by bare value
    /// transfers and by value attached to forwarded calls).
    #[must_use]
    pub fn balance_slot() -> SlotKey {
        derive_slot("router.balance")
    }
}

// =============================================================================
// SLOT ENCODING HELPERS
// =============================================================================

/// Encodes an address into the interop slot layout (right-aligned).
#[must_use]
pub fn address_slot_value(addr: Address) -> SlotValue {
    SlotValue::from_address(addr)
}

/// Decodes an address from the interop slot layout.
#[must_use]
pub fn slot_value_address(value: SlotValue) -> Address {
    value.to_address()
}

// =============================================================================
// TESTS
// =============================================================================
