//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the router depends on. Adapters implement these traits to
//! provide slot storage, module resolution, and event sinking; dependencies
//! point inward.

use crate::dispatch::CallFrame;
use crate::domain::entities::{CallContext, CallOutcome};
use crate::domain::value_objects::{Address, SlotKey, SlotValue};
use crate::errors::StorageError;
use crate::events::RouterEvent;
use async_trait::async_trait;
use std::sync::Arc;

// =============================================================================
// SLOT STORAGE
// =============================================================================

/// The router's persistent slot storage.
///
/// Forwarded modules never touch this port directly: the dispatch engine
/// wraps it in a per-call journal and exposes the journal through the
/// typed [`CallFrame`] capability, so every call commits or discards its
/// writes as one unit.
#[async_trait]
pub trait SlotStorage: Send + Sync {
    /// Reads a slot. Never-written slots read as the zero value.
    async fn get_slot(&self, key: SlotKey) -> Result<SlotValue, StorageError>;

    /// Writes a slot.
    async fn set_slot(&self, key: SlotKey, value: SlotValue) -> Result<(), StorageError>;
}

// =============================================================================
// IMPLEMENTATION MODULE (capability-typed target)
// =============================================================================

/// A deployed implementation module, resolved by address at dispatch time.
///
/// The module executes against the router's state through the
/// [`CallFrame`] capability; it has no storage of its own in this call
/// mode. The returned [`CallOutcome`] tag and payload cross the dispatch
/// boundary unchanged. Storage failures bubble out as errors rather than
/// being folded into a revert.
#[async_trait]
pub trait ImplementationModule: Send + Sync {
    /// Executes the module's logic for one forwarded call.
    async fn execute(
        &self,
        ctx: &CallContext,
        frame: &mut CallFrame<'_, '_>,
    ) -> Result<CallOutcome, StorageError>;
}

// =============================================================================
// MODULE RESOLVER
// =============================================================================

/// Resolves implementation targets to callable module capabilities.
///
/// Stands in for the environment's code store: an address "has code" iff
/// it resolves here. Registration verifies existence through this port;
/// dispatch resolves through it on every call.
pub trait ModuleResolver: Send + Sync {
    /// Resolves `target` to a module capability, or None if no code exists
    /// at that address.
    fn resolve(&self, target: Address) -> Option<Arc<dyn ImplementationModule>>;

    /// Returns true if executable code exists at `target`.
    fn has_code(&self, target: Address) -> bool {
        self.resolve(target).is_some()
    }
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Sink for the router's append-only observable event log.
pub trait EventSink: Send + Sync {
    /// Appends one event. Infallible; the log is fire-and-forget from the
    /// router's perspective.
    fn emit(&self, event: RouterEvent);
}

// =============================================================================
// TESTS
// =============================================================================
