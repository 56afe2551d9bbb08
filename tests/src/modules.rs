//! Fixture implementation modules.
//!
//! Each fixture is a small, deterministic module with observable behavior,
//! used as a registration target across the integration scenarios. All of
//! them run against the router's storage through the call frame; none hold
//! state of their own.

use async_trait::async_trait;
use version_router::prelude::*;

/// Slot the counter fixtures accumulate into.
#[must_use]
pub fn counter_slot() -> SlotKey {
    derive_slot("app.counter")
}

/// Reads the counter out of a raw output buffer.
#[must_use]
pub fn decode_count(output: &Bytes) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(output.as_slice());
    u64::from_be_bytes(buf)
}

fn encode_count(count: U256) -> Bytes {
    Bytes::from_vec(count.low_u64().to_be_bytes().to_vec())
}

// =============================================================================
// COUNTER FIXTURES (two "releases" over the same slot)
// =============================================================================

/// First release: increments the shared counter by one per call.
pub struct CounterV1;

#[async_trait]
impl ImplementationModule for CounterV1 {
    async fn execute(
        &self,
        _ctx: &CallContext,
        frame: &mut CallFrame<'_, '_>,
    ) -> Result<CallOutcome, StorageError> {
        let count = frame.load(counter_slot()).await?.to_u256() + U256::one();
        frame.store(counter_slot(), SlotValue::from_u256(count));
        Ok(CallOutcome::success(encode_count(count)))
    }
}

/// Second release: same slot, but increments by ten per call.
pub struct CounterV2;

#[async_trait]
impl ImplementationModule for CounterV2 {
    async fn execute(
        &self,
        _ctx: &CallContext,
        frame: &mut CallFrame<'_, '_>,
    ) -> Result<CallOutcome, StorageError> {
        let count = frame.load(counter_slot()).await?.to_u256() + U256::from(10);
        frame.store(counter_slot(), SlotValue::from_u256(count));
        Ok(CallOutcome::success(encode_count(count)))
    }
}

// =============================================================================
// PLUMBING FIXTURES
// =============================================================================

/// Returns its input unchanged.
pub struct EchoModule;

#[async_trait]
impl ImplementationModule for EchoModule {
    async fn execute(
        &self,
        ctx: &CallContext,
        _frame: &mut CallFrame<'_, '_>,
    ) -> Result<CallOutcome, StorageError> {
        Ok(CallOutcome::success(ctx.data.clone()))
    }
}

/// Reverts with its input as the revert payload.
pub struct RevertingModule;

#[async_trait]
impl ImplementationModule for RevertingModule {
    async fn execute(
        &self,
        ctx: &CallContext,
        _frame: &mut CallFrame<'_, '_>,
    ) -> Result<CallOutcome, StorageError> {
        Ok(CallOutcome::revert(ctx.data.clone()))
    }
}

/// Returns the caller identity the module observes (20 bytes).
pub struct CallerProbeModule;

#[async_trait]
impl ImplementationModule for CallerProbeModule {
    async fn execute(
        &self,
        ctx: &CallContext,
        _frame: &mut CallFrame<'_, '_>,
    ) -> Result<CallOutcome, StorageError> {
        Ok(CallOutcome::success(ctx.caller.as_bytes().to_vec()))
    }
}

/// Returns the attached value the module observes (32 bytes, big-endian).
pub struct ValueProbeModule;

#[async_trait]
impl ImplementationModule for ValueProbeModule {
    async fn execute(
        &self,
        ctx: &CallContext,
        _frame: &mut CallFrame<'_, '_>,
    ) -> Result<CallOutcome, StorageError> {
        Ok(CallOutcome::success(
            SlotValue::from_u256(ctx.value).as_bytes().to_vec(),
        ))
    }
}

// =============================================================================
// STATEFUL / RE-ENTRANT FIXTURES
// =============================================================================

/// Writes a marker slot, then fails.
///
/// Used to show that a failed call leaves no trace in committed storage.
pub struct PoisonModule;

impl PoisonModule {
    /// The slot the poison write lands in (before being rolled back).
    #[must_use]
    pub fn marker_slot() -> SlotKey {
        derive_slot("app.poison.marker")
    }
}

#[async_trait]
impl ImplementationModule for PoisonModule {
    async fn execute(
        &self,
        _ctx: &CallContext,
        frame: &mut CallFrame<'_, '_>,
    ) -> Result<CallOutcome, StorageError> {
        frame.store(Self::marker_slot(), SlotValue::from_u256(U256::one()));
        Ok(CallOutcome::revert(b"poisoned".to_vec()))
    }
}

/// Writes a marker slot, then delegates its payload to another version and
/// propagates whatever the child produced.
pub struct DelegatingModule {
    /// Version the child call goes to.
    pub inner: VersionId,
}

impl DelegatingModule {
    /// The slot this module marks before delegating.
    #[must_use]
    pub fn marker_slot() -> SlotKey {
        derive_slot("app.delegate.marker")
    }
}

#[async_trait]
impl ImplementationModule for DelegatingModule {
    async fn execute(
        &self,
        ctx: &CallContext,
        frame: &mut CallFrame<'_, '_>,
    ) -> Result<CallOutcome, StorageError> {
        frame.store(Self::marker_slot(), SlotValue::from_u256(U256::one()));
        match frame.call_version(ctx, self.inner, ctx.data.clone()).await {
            Ok(output) => Ok(CallOutcome::Success(output)),
            Err(err) => Ok(CallOutcome::revert(
                err.revert_payload().cloned().unwrap_or_default(),
            )),
        }
    }
}
