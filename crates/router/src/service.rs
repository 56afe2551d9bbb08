//! # Router Service
//!
//! Production-ready service tying the registry and dispatch engine to the
//! driven ports. Implements the public [`RouterApi`] and the message
//! handlers the host's transport layer drives.
//!
//! ## Concurrency
//!
//! Registry mutations take the write lock; every forwarded call holds the
//! read lock for its whole duration, so a call observes one registry
//! snapshot end to end and a mutation never lands mid-call. Forwarded
//! calls additionally serialize on the dispatch gate: journaled commits
//! are read-modify-write against shared storage and must not interleave.
//!
//! ## Security
//!
//! Caller identity comes from the transport envelope, never from payload
//! fields. The admin gate is checked before any mutation state is touched.

use crate::adapters::{InMemoryEventLog, InMemoryModuleStore, InMemorySlotStore};
use crate::dispatch::{DispatchEngine, StorageJournal};
use crate::domain::entities::{RelayedOutcome, RouterConfig};
use crate::domain::registry::Registry;
use crate::domain::services::{address_slot_value, well_known};
use crate::domain::value_objects::{Address, Bytes, SlotValue, VersionId, U256};
use crate::errors::RouterError;
use crate::events::{
    ExecuteAtVersionRequestPayload, ExecuteResponsePayload, MutationResponsePayload,
    RawCallRequestPayload, RegisterVersionRequestPayload, RemoveVersionRequestPayload,
    RouterEvent, SetDefaultVersionRequestPayload,
};
use crate::ports::inbound::RouterApi;
use crate::ports::outbound::{EventSink, ModuleResolver, SlotStorage};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// =============================================================================
// CONFIGURATION & STATISTICS
// =============================================================================

/// Router Service configuration.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Dispatch configuration.
    pub router: RouterConfig,
}

/// Statistics for the Router Service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Total forwarded calls (routed and fallback).
    pub calls_forwarded: u64,
    /// Forwarded calls whose target succeeded.
    pub successful_calls: u64,
    /// Forwarded calls that failed (target revert or resolution failure).
    pub failed_calls: u64,
    /// Applied registry mutations.
    pub registry_mutations: u64,
    /// Mutations rejected at the admin gate.
    pub rejected_mutations: u64,
    /// Average forwarded-call time in microseconds.
    pub avg_dispatch_time_us: u64,
}

// =============================================================================
// ROUTER SERVICE
// =============================================================================

/// The main Router Service.
///
/// This service:
/// 1. Administers the version registry behind the admin gate
/// 2. Forwards calls to versioned implementations against its own storage
/// 3. Mirrors the default's target into the well-known interop slot
/// 4. Maintains dispatch statistics
pub struct RouterService<S: SlotStorage> {
    /// Service configuration.
    config: ServiceConfig,
    /// The version registry.
    registry: RwLock<Registry>,
    /// Slot storage adapter.
    storage: Arc<S>,
    /// Dispatch engine over the module resolver.
    engine: DispatchEngine,
    /// Observable event sink.
    events: Arc<dyn EventSink>,
    /// Serializes forwarded calls and bare transfers against storage.
    dispatch_gate: Mutex<()>,
    /// Service statistics.
    stats: RwLock<ServiceStats>,
}

impl<S: SlotStorage> RouterService<S> {
    /// Deploys a router: constructs the service and writes the admin
    /// identity into its well-known storage slot.
    pub async fn deploy(
        storage: S,
        resolver: Arc<dyn ModuleResolver>,
        events: Arc<dyn EventSink>,
        admin: Address,
        config: ServiceConfig,
    ) -> Result<Self, RouterError> {
        let storage = Arc::new(storage);
        storage
            .set_slot(well_known::admin_slot(), address_slot_value(admin))
            .await?;

        info!(%admin, router = %config.router.router_address, "router deployed");

        Ok(Self {
            engine: DispatchEngine::new(resolver, config.router.clone()),
            config,
            registry: RwLock::new(Registry::new(admin)),
            storage,
            events,
            dispatch_gate: Mutex::new(()),
            stats: RwLock::new(ServiceStats::default()),
        })
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// The configuration this service was deployed with.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The underlying slot storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Snapshot of the registry, for inspection and consistency checks.
    pub async fn registry_snapshot(&self) -> Registry {
        self.registry.read().await.clone()
    }

    /// Current value of the well-known implementation mirror slot.
    pub async fn mirrored_implementation(&self) -> Result<SlotValue, RouterError> {
        Ok(self
            .storage
            .get_slot(well_known::implementation_slot())
            .await?)
    }

    // =========================================================================
    // REGISTRY ADMINISTRATION
    // =========================================================================

    /// Registers `version -> target` behind the admin gate.
    ///
    /// Validation happens up front, and the interop mirror slot is written
    /// before the registry mutates: a storage failure leaves the registry
    /// exactly as it was.
    async fn register_version_internal(
        &self,
        caller: Address,
        version: VersionId,
        target: Address,
    ) -> Result<(), RouterError> {
        let mut registry = self.registry.write().await;

        if let Err(err) = registry.require_admin(caller) {
            warn!(%caller, "unauthorized registration attempt");
            self.stats.write().await.rejected_mutations += 1;
            return Err(err);
        }

        if target.is_zero() || !self.engine.resolver().has_code(target) {
            return Err(RouterError::InvalidImplementation);
        }
        if registry.contains(version) {
            return Err(RouterError::VersionAlreadyExists(version));
        }

        // Mirror before mutating: the first registration of a non-zero
        // identifier implicitly selects the default, and the interop slot
        // must track it. The zero identifier never claims the default, so
        // the mirror stays zero until a real default exists.
        let becomes_default = registry.default_version().is_unset() && !version.is_unset();
        if becomes_default {
            self.storage
                .set_slot(well_known::implementation_slot(), address_slot_value(target))
                .await?;
        }

        let outcome = registry.register(version, target)?;
        self.stats.write().await.registry_mutations += 1;

        self.events.emit(RouterEvent::VersionRegistered { version, target });
        if outcome.became_default {
            self.events.emit(RouterEvent::DefaultVersionChanged {
                old_version: VersionId::UNSET,
                new_version: version,
            });
        }

        info!(%version, %target, became_default = outcome.became_default, "version registered");
        Ok(())
    }

    /// Removes `version` behind the admin gate.
    async fn remove_version_internal(
        &self,
        caller: Address,
        version: VersionId,
    ) -> Result<(), RouterError> {
        let mut registry = self.registry.write().await;

        if let Err(err) = registry.require_admin(caller) {
            warn!(%caller, "unauthorized removal attempt");
            self.stats.write().await.rejected_mutations += 1;
            return Err(err);
        }

        registry.remove(version)?;
        self.stats.write().await.registry_mutations += 1;

        info!(%version, "version removed");
        Ok(())
    }

    /// Changes the default version behind the admin gate, keeping the
    /// interop mirror slot in sync.
    async fn set_default_version_internal(
        &self,
        caller: Address,
        version: VersionId,
    ) -> Result<(), RouterError> {
        let mut registry = self.registry.write().await;

        if let Err(err) = registry.require_admin(caller) {
            warn!(%caller, "unauthorized default change attempt");
            self.stats.write().await.rejected_mutations += 1;
            return Err(err);
        }

        // Mirror before mutating, same ordering as registration.
        let target = registry.implementation(version)?;
        self.storage
            .set_slot(well_known::implementation_slot(), address_slot_value(target))
            .await?;

        let change = registry.set_default(version)?;
        self.stats.write().await.registry_mutations += 1;

        self.events.emit(RouterEvent::DefaultVersionChanged {
            old_version: change.old_version,
            new_version: change.new_version,
        });

        info!(old = %change.old_version, new = %change.new_version, "default version changed");
        Ok(())
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Forwards a routed call and commits or discards its journal.
    async fn execute_at_version_internal(
        &self,
        caller: Address,
        version: VersionId,
        payload: Bytes,
        value: U256,
    ) -> Result<Bytes, RouterError> {
        // Read lock held across the whole forward: the call sees one
        // registry snapshot, and mutations wait for it to finish. The gate
        // keeps two journals from committing interleaved writes.
        let registry = self.registry.read().await;
        let _gate = self.dispatch_gate.lock().await;
        let start = Instant::now();

        let mut journal = StorageJournal::new(self.storage.as_ref());
        let result = self
            .engine
            .execute_at(&registry, caller, version, payload, value, &mut journal)
            .await;

        let result = match result {
            Ok(output) => {
                journal.commit().await?;
                Ok(output)
            }
            // Journal dropped: every write of the call tree is discarded.
            Err(err) => Err(err),
        };

        self.record_dispatch(&result, start).await;
        result
    }

    /// Forwards a fallback call and commits or discards its journal.
    async fn fallback_internal(
        &self,
        caller: Address,
        input: Bytes,
        value: U256,
    ) -> Result<RelayedOutcome, RouterError> {
        let registry = self.registry.read().await;
        let _gate = self.dispatch_gate.lock().await;
        let start = Instant::now();

        let mut journal = StorageJournal::new(self.storage.as_ref());
        let relay = self
            .engine
            .fallback(&registry, caller, input, value, &mut journal)
            .await;

        let relay = match relay {
            Ok(relay) => {
                if relay.success {
                    journal.commit().await?;
                }
                Ok(relay)
            }
            Err(err) => Err(err),
        };

        let as_result = match &relay {
            Ok(r) if r.success => Ok(()),
            _ => Err(()),
        };
        self.record_dispatch(&as_result, start).await;
        relay
    }

    /// Credits a bare value transfer directly to storage. Always accepted;
    /// performs no version resolution and runs no module.
    async fn receive_internal(&self, caller: Address, value: U256) -> Result<(), RouterError> {
        let _gate = self.dispatch_gate.lock().await;
        let slot = well_known::balance_slot();
        let held = self.storage.get_slot(slot).await?.to_u256();
        self.storage
            .set_slot(slot, SlotValue::from_u256(held.saturating_add(value)))
            .await?;

        debug!(%caller, %value, "bare value transfer accepted");
        Ok(())
    }

    /// Folds one forwarded call into the statistics.
    async fn record_dispatch<T, E>(&self, result: &Result<T, E>, start: Instant) {
        let elapsed_us = start.elapsed().as_micros() as u64;
        let mut stats = self.stats.write().await;
        stats.calls_forwarded += 1;
        match result {
            Ok(_) => stats.successful_calls += 1,
            Err(_) => stats.failed_calls += 1,
        }
        let total = stats.calls_forwarded;
        stats.avg_dispatch_time_us =
            (stats.avg_dispatch_time_us * (total - 1) + elapsed_us) / total;
    }

    // =========================================================================
    // MESSAGE HANDLERS (transport-facing)
    // =========================================================================

    /// Handle a registration request from the transport layer.
    #[instrument(skip(self, payload), fields(correlation_id = %correlation_id))]
    pub async fn handle_register_version(
        &self,
        caller: Address,
        correlation_id: Uuid,
        payload: RegisterVersionRequestPayload,
    ) -> MutationResponsePayload {
        let result = self
            .register_version_internal(caller, payload.version, payload.target)
            .await;
        Self::mutation_response(result)
    }

    /// Handle a removal request from the transport layer.
    #[instrument(skip(self, payload), fields(correlation_id = %correlation_id))]
    pub async fn handle_remove_version(
        &self,
        caller: Address,
        correlation_id: Uuid,
        payload: RemoveVersionRequestPayload,
    ) -> MutationResponsePayload {
        let result = self.remove_version_internal(caller, payload.version).await;
        Self::mutation_response(result)
    }

    /// Handle a default-change request from the transport layer.
    #[instrument(skip(self, payload), fields(correlation_id = %correlation_id))]
    pub async fn handle_set_default_version(
        &self,
        caller: Address,
        correlation_id: Uuid,
        payload: SetDefaultVersionRequestPayload,
    ) -> MutationResponsePayload {
        let result = self
            .set_default_version_internal(caller, payload.version)
            .await;
        Self::mutation_response(result)
    }

    /// Handle a routed execution request from the transport layer.
    ///
    /// Target failures are folded into the response with the original
    /// revert payload in `output`; router-side failures carry their
    /// description as bytes so the transport can relay something.
    #[instrument(skip(self, payload), fields(correlation_id = %correlation_id))]
    pub async fn handle_execute_at_version(
        &self,
        caller: Address,
        correlation_id: Uuid,
        payload: ExecuteAtVersionRequestPayload,
    ) -> ExecuteResponsePayload {
        let result = self
            .execute_at_version_internal(caller, payload.version, payload.payload, payload.value)
            .await;

        match result {
            Ok(output) => ExecuteResponsePayload {
                success: true,
                output,
            },
            Err(err) => {
                debug!(error = %err, "routed call failed");
                ExecuteResponsePayload {
                    success: false,
                    output: match err.revert_payload() {
                        Some(payload) => payload.clone(),
                        None if err.is_forwarded_failure() => Bytes::new(),
                        None => Bytes::from_vec(err.to_string().into_bytes()),
                    },
                }
            }
        }
    }

    /// Handle a raw (fallback) call request from the transport layer.
    #[instrument(skip(self, payload), fields(correlation_id = %correlation_id))]
    pub async fn handle_raw_call(
        &self,
        caller: Address,
        correlation_id: Uuid,
        payload: RawCallRequestPayload,
    ) -> ExecuteResponsePayload {
        match self
            .fallback_internal(caller, payload.input, payload.value)
            .await
        {
            Ok(relay) => ExecuteResponsePayload {
                success: relay.success,
                output: relay.payload,
            },
            Err(err) => {
                debug!(error = %err, "fallback call failed to resolve");
                ExecuteResponsePayload {
                    success: false,
                    output: Bytes::from_vec(err.to_string().into_bytes()),
                }
            }
        }
    }

    fn mutation_response(result: Result<(), RouterError>) -> MutationResponsePayload {
        match result {
            Ok(()) => MutationResponsePayload {
                success: true,
                error: None,
            },
            Err(err) => MutationResponsePayload {
                success: false,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Test-service bundle: the router plus handles to its in-memory adapters.
pub struct TestRouter {
    /// The deployed service.
    pub service: RouterService<InMemorySlotStore>,
    /// Code store; deploy modules here before registering their addresses.
    pub modules: Arc<InMemoryModuleStore>,
    /// Observable event log.
    pub events: Arc<InMemoryEventLog>,
}

/// Create a default router with in-memory adapters (for testing).
pub async fn create_test_service(admin: Address) -> TestRouter {
    let modules = Arc::new(InMemoryModuleStore::new());
    let events = Arc::new(InMemoryEventLog::new());
    let service = RouterService::deploy(
        InMemorySlotStore::new(),
        Arc::clone(&modules) as Arc<dyn ModuleResolver>,
        Arc::clone(&events) as Arc<dyn EventSink>,
        admin,
        ServiceConfig::default(),
    )
    .await
    .expect("in-memory deploy cannot fail");

    TestRouter {
        service,
        modules,
        events,
    }
}

// =============================================================================
// RouterApi Implementation
// =============================================================================

#[async_trait]
impl<S: SlotStorage> RouterApi for RouterService<S> {
    async fn register_version(
        &self,
        caller: Address,
        version: VersionId,
        target: Address,
    ) -> Result<(), RouterError> {
        self.register_version_internal(caller, version, target).await
    }

    async fn remove_version(
        &self,
        caller: Address,
        version: VersionId,
    ) -> Result<(), RouterError> {
        self.remove_version_internal(caller, version).await
    }

    async fn set_default_version(
        &self,
        caller: Address,
        version: VersionId,
    ) -> Result<(), RouterError> {
        self.set_default_version_internal(caller, version).await
    }

    async fn get_implementation(&self, version: VersionId) -> Result<Address, RouterError> {
        self.registry.read().await.implementation(version)
    }

    async fn get_default_version(&self) -> VersionId {
        self.registry.read().await.default_version()
    }

    async fn get_versions(&self) -> Vec<VersionId> {
        self.registry.read().await.versions().to_vec()
    }

    async fn execute_at_version(
        &self,
        caller: Address,
        version: VersionId,
        payload: Bytes,
        value: U256,
    ) -> Result<Bytes, RouterError> {
        self.execute_at_version_internal(caller, version, payload, value)
            .await
    }

    async fn fallback(
        &self,
        caller: Address,
        input: Bytes,
        value: U256,
    ) -> Result<RelayedOutcome, RouterError> {
        self.fallback_internal(caller, input, value).await
    }

    async fn receive(&self, caller: Address, value: U256) -> Result<(), RouterError> {
        self.receive_internal(caller, value).await
    }
}

// =============================================================================
// TESTS
// =============================================================================
