//! # Adapters Layer
//!
//! In-memory implementations of the driven ports, used for testing and
//! in-process embedding.

pub mod event_log;
pub mod module_store;
pub mod slot_store;

pub use event_log::InMemoryEventLog;
pub use module_store::InMemoryModuleStore;
pub use slot_store::InMemorySlotStore;
