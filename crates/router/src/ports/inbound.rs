//! # Driving Ports (API - Inbound)
//!
//! The public API of the router. External systems use this trait to
//! administer the registry and to dispatch calls; adapters translate
//! transport envelopes into these operations.

use crate::domain::entities::RelayedOutcome;
use crate::domain::value_objects::{Address, Bytes, VersionId, U256};
use crate::errors::RouterError;
use async_trait::async_trait;

// =============================================================================
// ROUTER API (Primary Driving Port)
// =============================================================================

/// Primary API of the versioned router.
///
/// Administrative operations (`register_version`, `remove_version`,
/// `set_default_version`) are admin-gated: the caller identity is checked
/// against the admin before any registry state is touched. Reads are
/// public. Dispatch operations forward under delegate semantics, executing
/// the target's logic against the router's own slot storage.
#[async_trait]
pub trait RouterApi: Send + Sync {
    /// Registers `version -> target`. Admin-only.
    ///
    /// Fails with `InvalidImplementation` if `target` is the zero address
    /// or has no resolvable code, and with `VersionAlreadyExists` on an
    /// identifier collision. The first registration in the router's
    /// lifetime implicitly selects the default version.
    async fn register_version(
        &self,
        caller: Address,
        version: VersionId,
        target: Address,
    ) -> Result<(), RouterError>;

    /// Removes `version`. Admin-only.
    ///
    /// Fails with `VersionNotFound` if absent and with
    /// `CannotRemoveDefaultVersion` if it is the current default.
    async fn remove_version(&self, caller: Address, version: VersionId)
        -> Result<(), RouterError>;

    /// Makes `version` the default. Admin-only.
    ///
    /// Fails with `VersionNotFound` if absent. Re-setting the current
    /// default is allowed; the changed event fires with an identical
    /// old/new pair and the interop mirror slot is re-written.
    async fn set_default_version(
        &self,
        caller: Address,
        version: VersionId,
    ) -> Result<(), RouterError>;

    /// Looks up the implementation target for `version`. Public read.
    async fn get_implementation(&self, version: VersionId) -> Result<Address, RouterError>;

    /// Returns the current default version (the unset identifier before
    /// the first registration). Public read.
    async fn get_default_version(&self) -> VersionId;

    /// Returns the live version identifiers in unspecified order. Public
    /// read; callers must not depend on ordering after removals.
    async fn get_versions(&self) -> Vec<VersionId>;

    /// Routed call: dispatches `payload` to the implementation registered
    /// under `version`, executing it against the router's state with the
    /// caller identity and attached value preserved.
    ///
    /// Returns the target's raw output bytes. On target failure the
    /// original revert payload is re-raised byte-for-byte
    /// (`TargetReverted`), or `CallFailed` when the target supplied none.
    async fn execute_at_version(
        &self,
        caller: Address,
        version: VersionId,
        payload: Bytes,
        value: U256,
    ) -> Result<Bytes, RouterError>;

    /// Fallback call: forwards the entire original `input` buffer verbatim
    /// to the current default and relays the terminal outcome unchanged.
    ///
    /// Fails with `VersionNotFound` when no default is configured or its
    /// target is no longer resolvable.
    async fn fallback(
        &self,
        caller: Address,
        input: Bytes,
        value: U256,
    ) -> Result<RelayedOutcome, RouterError>;

    /// Bare value transfer with no payload: always accepted, credits the
    /// router's held balance, performs no version resolution.
    async fn receive(&self, caller: Address, value: U256) -> Result<(), RouterError>;
}
