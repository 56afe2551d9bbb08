//! # Version Router - Versioned Execution Dispatch
//!
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! A versioned execution router: an administrator registers immutable
//! implementation modules under opaque version identifiers, and callers
//! either pin a version explicitly or fall through to the current default.
//! Forwarding uses delegate semantics, so every version executes against
//! the router's own storage and accumulated state survives upgrades.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Enumeration matches the mapping | `domain/invariants.rs` - `check_enumeration_consistency()` |
//! | INVARIANT-2 | Default is always registered | `domain/invariants.rs` - `check_default_membership()` |
//! | INVARIANT-3 | Default set once registry is non-empty | `domain/invariants.rs` - `check_default_stickiness()` |
//! | INVARIANT-4 | Registered targets are non-zero | `domain/invariants.rs` - `check_live_targets()` |
//! | INVARIANT-5 | Mirror slot tracks the default's target | `domain/invariants.rs` - `check_mirror_sync()` |
//!
//! ## Security
//!
//! - **Envelope-Only Identity**: caller identity comes from the transport
//!   envelope, never from payload fields
//! - **Admin Gate**: registry mutations check the admin before touching state
//! - **All-or-Nothing State**: a failed forwarded call discards every write
//!   of its call tree via the per-call journal
//!
//! ## Known Sharp Edge
//!
//! The all-zero version identifier doubles as the "no default" sentinel.
//! Registering it is permitted, but the default still reads as unset
//! afterwards and the *next* registration claims the default. Administrators
//! should avoid the zero identifier.
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Registry | `domain/registry.rs` | Version book-keeping & admin gate |
//! | Dispatch Engine | `dispatch/engine.rs` | Delegate-style call forwarding |
//! | Storage Journal | `dispatch/journal.rs` | Per-call all-or-nothing writes |
//! | Service | `service.rs` | API surface, events, mirror slot |
//!
//! ## Usage Example
//!
//! ```ignore
//! use version_router::prelude::*;
//!
//! // Register and dispatch
//! service.register_version(admin, VersionId::from_tag("v1"), target).await?;
//! let output = service
//!     .execute_at_version(caller, VersionId::from_tag("v1"), payload, U256::zero())
//!     .await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{CallContext, CallOutcome, RelayedOutcome, RouterConfig};

    // Value objects
    pub use crate::domain::value_objects::{Address, Bytes, SlotKey, SlotValue, VersionId, U256};

    // Domain services
    pub use crate::domain::services::{
        address_slot_value, derive_slot, keccak256, slot_value_address, well_known,
    };

    // Registry
    pub use crate::domain::registry::{DefaultChange, RegisterOutcome, Registry};

    // Invariants
    pub use crate::domain::invariants::{
        check_all, check_mirror_sync, InvariantCheckResult, InvariantViolation,
    };

    // Dispatch
    pub use crate::dispatch::{CallFrame, DispatchEngine, StorageJournal};

    // Ports
    pub use crate::ports::inbound::RouterApi;
    pub use crate::ports::outbound::{
        EventSink, ImplementationModule, ModuleResolver, SlotStorage,
    };

    // Events
    pub use crate::events::{
        topics, ExecuteAtVersionRequestPayload, ExecuteResponsePayload, MutationResponsePayload,
        RawCallRequestPayload, RegisterVersionRequestPayload, RemoveVersionRequestPayload,
        RouterEvent, SetDefaultVersionRequestPayload,
    };

    // Errors
    pub use crate::errors::{RouterError, StorageError};

    // Adapters
    pub use crate::adapters::{InMemoryEventLog, InMemoryModuleStore, InMemorySlotStore};

    // Service
    pub use crate::service::{
        create_test_service, RouterService, ServiceConfig, ServiceStats, TestRouter,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
