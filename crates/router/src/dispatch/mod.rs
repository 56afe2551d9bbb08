//! # Dispatch Layer
//!
//! The state-preserving call forwarder: a per-call write journal over slot
//! storage, the engine that resolves versions and runs modules against it,
//! and the typed frame capability modules execute through.

pub mod engine;
pub mod journal;

pub use engine::{CallFrame, DispatchEngine};
pub use journal::StorageJournal;
