//! # Version Registry
//!
//! The single registry entity owning the mapping from version identifier
//! to implementation target, the enumeration set of live versions, the
//! current default version, and the admin identity.
//!
//! Pure state plus invariant enforcement; no forwarding logic and no I/O.
//! The service layer performs the admin gate (via [`Registry::require_admin`])
//! and target code-existence validation before invoking mutations, then
//! sinks the events these mutations imply.
//!
//! ## Lifecycle
//!
//! A version entry is created only by successful registration (which
//! rejects existing keys), destroyed only by explicit removal (which
//! rejects the current default), and never mutated in place. Removal makes
//! the identifier available again for a fresh registration.

use crate::domain::value_objects::{Address, VersionId};
use crate::errors::RouterError;
use std::collections::HashMap;

// =============================================================================
// MUTATION OUTCOMES
// =============================================================================

/// Outcome of a successful registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterOutcome {
    /// True if this registration implicitly selected the default. Happens
    /// only on the first registration of a non-zero identifier in the
    /// registry's lifetime.
    pub became_default: bool,
}

/// Outcome of a successful default change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefaultChange {
    /// Default before the change (may equal `new_version`).
    pub old_version: VersionId,
    /// Default after the change.
    pub new_version: VersionId,
}

// =============================================================================
// REGISTRY
// =============================================================================

/// The version registry. Exactly one instance per router, process lifetime.
#[derive(Clone, Debug)]
pub struct Registry {
    /// Admin identity, stored once at construction.
    admin: Address,
    /// Version identifier to implementation target.
    implementations: HashMap<VersionId, Address>,
    /// Enumeration set; unordered, maintained by swap-remove.
    version_list: Vec<VersionId>,
    /// Current default version; the unset identifier until first registration.
    default_version: VersionId,
}

impl Registry {
    /// Creates an empty registry owned by `admin`.
    #[must_use]
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            implementations: HashMap::new(),
            version_list: Vec::new(),
            default_version: VersionId::UNSET,
        }
    }

    /// Returns the admin identity.
    #[must_use]
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Fails with `UnauthorizedCaller` unless `caller` is the admin.
    ///
    /// Must be checked before any mutation touches or reads registry state.
    pub fn require_admin(&self, caller: Address) -> Result<(), RouterError> {
        if caller == self.admin {
            Ok(())
        } else {
            Err(RouterError::UnauthorizedCaller(caller))
        }
    }

    /// Registers `version -> target`.
    ///
    /// The caller (service layer) has already validated the admin gate and
    /// that `target` is non-zero with resolvable code. Fails with
    /// `VersionAlreadyExists` on an identifier collision. The very first
    /// registration of a non-zero identifier implicitly selects the default
    /// version.
    pub fn register(
        &mut self,
        version: VersionId,
        target: Address,
    ) -> Result<RegisterOutcome, RouterError> {
        if self.implementations.contains_key(&version) {
            return Err(RouterError::VersionAlreadyExists(version));
        }

        self.implementations.insert(version, target);
        self.version_list.push(version);

        // First registration auto-selects the default. The reserved zero
        // identifier can never become the default: selecting it would be
        // indistinguishable from "unset", so it is skipped here and the
        // next registration claims the default instead. See the crate
        // documentation for this ambiguity.
        let became_default = self.default_version.is_unset() && !version.is_unset();
        if became_default {
            self.default_version = version;
        }

        Ok(RegisterOutcome { became_default })
    }

    /// Removes `version` from the registry.
    ///
    /// Fails with `VersionNotFound` if absent and with
    /// `CannotRemoveDefaultVersion` if it is the current default; a default
    /// change must happen first. Enumeration order is not stable across
    /// removals (swap-remove).
    pub fn remove(&mut self, version: VersionId) -> Result<(), RouterError> {
        if !self.implementations.contains_key(&version) {
            return Err(RouterError::VersionNotFound(version));
        }
        if version == self.default_version {
            return Err(RouterError::CannotRemoveDefaultVersion);
        }

        self.implementations.remove(&version);
        if let Some(idx) = self.version_list.iter().position(|v| *v == version) {
            self.version_list.swap_remove(idx);
        }

        Ok(())
    }

    /// Sets the default version.
    ///
    /// Fails with `VersionNotFound` if absent. Setting the default to its
    /// current value is allowed and reports an identical old/new pair.
    pub fn set_default(&mut self, version: VersionId) -> Result<DefaultChange, RouterError> {
        if !self.implementations.contains_key(&version) {
            return Err(RouterError::VersionNotFound(version));
        }

        let old_version = self.default_version;
        self.default_version = version;

        Ok(DefaultChange {
            old_version,
            new_version: version,
        })
    }

    /// Looks up the implementation target for `version`.
    ///
    /// Pure lookup; fails with `VersionNotFound` if absent.
    pub fn implementation(&self, version: VersionId) -> Result<Address, RouterError> {
        self.implementations
            .get(&version)
            .copied()
            .ok_or(RouterError::VersionNotFound(version))
    }

    /// Returns the current default version (the unset identifier before the
    /// first registration).
    #[must_use]
    pub fn default_version(&self) -> VersionId {
        self.default_version
    }

    /// Returns the target of the current default, if one is configured.
    #[must_use]
    pub fn default_target(&self) -> Option<Address> {
        if self.default_version.is_unset() {
            return None;
        }
        self.implementations.get(&self.default_version).copied()
    }

    /// Returns the live version identifiers. Order is unspecified and not
    /// stable across removals; callers must treat this as a set.
    #[must_use]
    pub fn versions(&self) -> &[VersionId] {
        &self.version_list
    }

    /// Returns true if `version` is registered.
    #[must_use]
    pub fn contains(&self, version: VersionId) -> bool {
        self.implementations.contains_key(&version)
    }

    /// Number of registered versions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    /// Returns true if the registry holds no versions. Since the default
    /// cannot be removed, this only happens before the first registration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
