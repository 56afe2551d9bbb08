//! # Dispatch Engine
//!
//! Forwards calls to versioned implementation modules under delegate
//! semantics: the module executes against the router's own slot storage,
//! observing the original caller identity and attached value. Outcomes
//! cross the boundary unchanged.
//!
//! | Path | Resolution | Result shape |
//! |------|------------|--------------|
//! | `execute_at` | explicit version | output bytes, revert re-raised |
//! | `fallback`   | current default  | terminal relay, never re-raised |

use crate::dispatch::journal::StorageJournal;
use crate::domain::entities::{CallContext, CallOutcome, RelayedOutcome, RouterConfig};
use crate::domain::registry::Registry;
use crate::domain::services::well_known;
use crate::domain::value_objects::{Address, Bytes, SlotKey, SlotValue, VersionId, U256};
use crate::errors::{RouterError, StorageError};
use crate::ports::outbound::{ImplementationModule, ModuleResolver};
use std::sync::Arc;
use tracing::{debug, trace};

// =============================================================================
// DISPATCH ENGINE
// =============================================================================

/// Forwards calls to implementation modules resolved by address.
pub struct DispatchEngine {
    resolver: Arc<dyn ModuleResolver>,
    config: RouterConfig,
}

impl DispatchEngine {
    /// Creates an engine over a module resolver.
    #[must_use]
    pub fn new(resolver: Arc<dyn ModuleResolver>, config: RouterConfig) -> Self {
        Self { resolver, config }
    }

    /// The module resolver this engine dispatches through.
    #[must_use]
    pub fn resolver(&self) -> &dyn ModuleResolver {
        self.resolver.as_ref()
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Dispatches `payload` to the implementation registered under
    /// `version`, executing it against the journal.
    ///
    /// Returns the target's raw output on success. A target failure is
    /// re-raised with its original payload intact; the caller is expected
    /// to discard the journal in that case.
    pub async fn execute_at(
        &self,
        registry: &Registry,
        caller: Address,
        version: VersionId,
        payload: Bytes,
        value: U256,
        journal: &mut StorageJournal<'_>,
    ) -> Result<Bytes, RouterError> {
        let target = registry.implementation(version)?;
        let module = self.resolve_module(target, version)?;
        debug!(%version, %target, payload_len = payload.len(), "dispatching routed call");

        self.credit_value(journal, value).await?;
        let ctx = CallContext::new_external(caller, self.config.router_address, value, payload);
        self.run(registry, module, &ctx, journal).await
    }

    /// Forwards the entire `input` buffer to the current default and relays
    /// the terminal outcome unchanged.
    ///
    /// Unlike [`execute_at`](Self::execute_at), a revert here is not an
    /// error of the router: it is relayed as a failed [`RelayedOutcome`].
    /// Only resolution failures surface as errors.
    pub async fn fallback(
        &self,
        registry: &Registry,
        caller: Address,
        input: Bytes,
        value: U256,
        journal: &mut StorageJournal<'_>,
    ) -> Result<RelayedOutcome, RouterError> {
        let default = registry.default_version();
        if default.is_unset() {
            return Err(RouterError::VersionNotFound(default));
        }
        let target = registry.implementation(default)?;
        let module = self.resolve_module(target, default)?;
        debug!(version = %default, %target, input_len = input.len(), "dispatching fallback call");

        self.credit_value(journal, value).await?;
        let ctx = CallContext::new_external(caller, self.config.router_address, value, input);
        let mut frame = CallFrame {
            engine: self,
            registry,
            journal,
        };
        let outcome = module.execute(&ctx, &mut frame).await?;
        Ok(RelayedOutcome::from_outcome(outcome))
    }

    /// Executes a resolved module and maps its outcome to the routed-call
    /// result shape.
    async fn run(
        &self,
        registry: &Registry,
        module: Arc<dyn ImplementationModule>,
        ctx: &CallContext,
        journal: &mut StorageJournal<'_>,
    ) -> Result<Bytes, RouterError> {
        let mut frame = CallFrame {
            engine: self,
            registry,
            journal,
        };
        match module.execute(ctx, &mut frame).await? {
            CallOutcome::Success(output) => Ok(output),
            CallOutcome::Revert(payload) => Err(RouterError::from_revert(payload)),
        }
    }

    /// Resolves a target address to a module capability.
    ///
    /// A registered target whose code has since vanished is reported as the
    /// version being unavailable, matching the lookup-miss error so callers
    /// see one failure mode for "cannot reach this version".
    fn resolve_module(
        &self,
        target: Address,
        version: VersionId,
    ) -> Result<Arc<dyn ImplementationModule>, RouterError> {
        self.resolver
            .resolve(target)
            .ok_or(RouterError::VersionNotFound(version))
    }

    /// Rejects nested dispatch past the configured depth limit.
    fn check_depth(&self, depth: u16) -> Result<(), RouterError> {
        if depth > self.config.max_call_depth {
            return Err(RouterError::CallDepthExceeded {
                depth,
                max: self.config.max_call_depth,
            });
        }
        Ok(())
    }

    /// Credits attached value to the router's held balance, through the
    /// journal so a failing call rolls the credit back with everything else.
    async fn credit_value(
        &self,
        journal: &mut StorageJournal<'_>,
        value: U256,
    ) -> Result<(), StorageError> {
        if value.is_zero() {
            return Ok(());
        }
        let slot = well_known::balance_slot();
        let held = journal.load(slot).await?.to_u256();
        journal.store(slot, SlotValue::from_u256(held.saturating_add(value)));
        trace!(%value, "credited attached value");
        Ok(())
    }
}

// =============================================================================
// CALL FRAME (module-facing capability)
// =============================================================================

/// Capability handed to an executing module.
///
/// Everything a module may do to the router flows through this frame:
/// journaled slot access, registry reads, and nested dispatch. Nested
/// calls reborrow the same journal, so all writes in a call tree commit
/// or discard together.
pub struct CallFrame<'a, 'j> {
    engine: &'a DispatchEngine,
    registry: &'a Registry,
    journal: &'a mut StorageJournal<'j>,
}

impl CallFrame<'_, '_> {
    /// Reads a slot of the router's state (pending writes included).
    pub async fn load(&self, key: SlotKey) -> Result<SlotValue, StorageError> {
        self.journal.load(key).await
    }

    /// Writes a slot of the router's state (journaled).
    pub fn store(&mut self, key: SlotKey, value: SlotValue) {
        self.journal.store(key, value);
    }

    /// The current default version.
    #[must_use]
    pub fn default_version(&self) -> VersionId {
        self.registry.default_version()
    }

    /// Looks up the implementation target for `version`.
    pub fn implementation(&self, version: VersionId) -> Result<Address, RouterError> {
        self.registry.implementation(version)
    }

    /// Dispatches a nested delegate call to `version` with `payload`.
    ///
    /// The child runs in this frame's journal with caller identity, value,
    /// and executing address preserved from `ctx`. A child revert is
    /// re-raised here; whether that unwinds the whole call is the
    /// caller-module's choice, but any state the child wrote stays pending
    /// in the shared journal either way.
    pub async fn call_version(
        &mut self,
        ctx: &CallContext,
        version: VersionId,
        payload: Bytes,
    ) -> Result<Bytes, RouterError> {
        let child = ctx.child_delegate(payload);
        self.engine.check_depth(child.depth)?;
        let target = self.registry.implementation(version)?;
        let module = self.engine.resolve_module(target, version)?;
        trace!(%version, depth = child.depth, "nested delegate dispatch");

        let mut frame = CallFrame {
            engine: self.engine,
            registry: self.registry,
            journal: &mut *self.journal,
        };
        match module.execute(&child, &mut frame).await? {
            CallOutcome::Success(output) => Ok(output),
            CallOutcome::Revert(payload) => Err(RouterError::from_revert(payload)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
