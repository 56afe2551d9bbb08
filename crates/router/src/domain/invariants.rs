//! # Domain Invariants
//!
//! Critical invariants that MUST hold after every successful registry
//! operation. Checked at runtime in tests and debug assertions.
//!
//! | ID | Invariant |
//! |----|-----------|
//! | INVARIANT-1 | Enumeration consistency: version list equals the mapping key set |
//! | INVARIANT-2 | Default membership: the default is unset or a registered version |
//! | INVARIANT-3 | Default stickiness: a non-empty registry always has a default |
//! | INVARIANT-4 | Live targets: every registered version maps to a non-zero target |
//! | INVARIANT-5 | Mirror sync: the interop slot mirrors the default's target |

use crate::domain::registry::Registry;
use crate::domain::services::address_slot_value;
use crate::domain::value_objects::{SlotValue, VersionId};
use std::collections::HashSet;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: Enumeration consistency.
///
/// The enumeration list and the key set of the implementation mapping are
/// always equal as sets, with no duplicates in the list.
#[must_use]
pub fn check_enumeration_consistency(registry: &Registry) -> bool {
    let listed: HashSet<VersionId> = registry.versions().iter().copied().collect();
    if listed.len() != registry.versions().len() {
        return false; // duplicate entries
    }
    if listed.len() != registry.len() {
        return false;
    }
    listed.iter().all(|v| registry.contains(*v))
}

/// INVARIANT-2: Default membership.
///
/// The default version is either the unset identifier or a key currently
/// present in the mapping.
#[must_use]
pub fn check_default_membership(registry: &Registry) -> bool {
    let default = registry.default_version();
    default.is_unset() || registry.contains(default)
}

/// INVARIANT-3: Default stickiness.
///
/// Once any version is registered, the default is never unset again.
/// Exception: when the reserved zero identifier itself is registered, the
/// default is indistinguishable from unset, so the check also passes when
/// the zero identifier is a key.
#[must_use]
pub fn check_default_stickiness(registry: &Registry) -> bool {
    registry.is_empty()
        || !registry.default_version().is_unset()
        || registry.contains(VersionId::UNSET)
}

/// INVARIANT-4: Live targets.
///
/// Every registered version maps to a non-zero target (code existence was
/// verified at registration time).
#[must_use]
pub fn check_live_targets(registry: &Registry) -> bool {
    registry
        .versions()
        .iter()
        .all(|v| registry.implementation(*v).map(|t| !t.is_zero()).unwrap_or(false))
}

/// INVARIANT-5: Mirror sync.
///
/// The interop implementation slot holds the current default's target
/// (or zero while no default is configured). Takes the mirrored value as
/// a parameter because reading it requires the storage port.
#[must_use]
pub fn check_mirror_sync(registry: &Registry, mirrored: SlotValue) -> bool {
    match registry.default_target() {
        Some(target) => mirrored == address_slot_value(target),
        None => mirrored.is_zero(),
    }
}

/// Checks the storage-independent invariants at once.
#[must_use]
pub fn check_all(registry: &Registry) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_enumeration_consistency(registry) {
        violations.push(InvariantViolation::EnumerationMismatch {
            listed: registry.versions().len(),
            mapped: registry.len(),
        });
    }
    if !check_default_membership(registry) {
        violations.push(InvariantViolation::DanglingDefault(registry.default_version()));
    }
    if !check_default_stickiness(registry) {
        violations.push(InvariantViolation::DefaultLost);
    }
    if !check_live_targets(registry) {
        violations.push(InvariantViolation::ZeroTarget);
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking the registry invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Enumeration list and mapping key set disagree.
    EnumerationMismatch {
        /// Entries in the enumeration list.
        listed: usize,
        /// Keys in the implementation mapping.
        mapped: usize,
    },
    /// The default version is not a registered key.
    DanglingDefault(VersionId),
    /// A non-empty registry reads as having no default.
    DefaultLost,
    /// A registered version maps to the zero target.
    ZeroTarget,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnumerationMismatch { listed, mapped } => {
                write!(f, "enumeration mismatch: {listed} listed, {mapped} mapped")
            }
            Self::DanglingDefault(version) => {
                write!(f, "default version {version} is not registered")
            }
            Self::DefaultLost => write!(f, "non-empty registry has no default"),
            Self::ZeroTarget => write!(f, "registered version maps to the zero target"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
