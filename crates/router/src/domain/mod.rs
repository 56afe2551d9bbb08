//! # Domain Layer
//!
//! Pure business logic for the versioned router:
//! - `value_objects`: immutable primitives (addresses, version ids, slots)
//! - `entities`: call context, call outcomes, configuration
//! - `registry`: the version registry entity and its mutations
//! - `services`: keccak hashing and well-known slot derivation
//! - `invariants`: runtime invariant checks
//!
//! No I/O and no async code live here.

pub mod entities;
pub mod invariants;
pub mod registry;
pub mod services;
pub mod value_objects;
