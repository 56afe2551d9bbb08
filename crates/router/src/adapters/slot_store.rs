//! # Slot Store Adapter
//!
//! In-memory slot storage implementation for testing and embedding.
//! Production deployments would back this with the host's durable state.

use crate::domain::value_objects::{SlotKey, SlotValue};
use crate::errors::StorageError;
use crate::ports::outbound::SlotStorage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory slot storage.
#[derive(Debug, Default)]
pub struct InMemorySlotStore {
    /// Committed slots. Absent keys read as the zero value.
    slots: RwLock<HashMap<SlotKey, SlotValue>>,
}

impl InMemorySlotStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots holding a written value.
    #[must_use]
    pub fn written_slots(&self) -> usize {
        self.slots.read().unwrap().len()
    }

    /// Synchronous read for test assertions.
    #[must_use]
    pub fn peek(&self, key: SlotKey) -> SlotValue {
        self.slots
            .read()
            .unwrap()
            .get(&key)
            .copied()
            .unwrap_or(SlotValue::ZERO)
    }
}

#[async_trait]
impl SlotStorage for InMemorySlotStore {
    async fn get_slot(&self, key: SlotKey) -> Result<SlotValue, StorageError> {
        Ok(self
            .slots
            .read()
            .unwrap()
            .get(&key)
            .copied()
            .unwrap_or(SlotValue::ZERO))
    }

    async fn set_slot(&self, key: SlotKey, value: SlotValue) -> Result<(), StorageError> {
        self.slots.write().unwrap().insert(key, value);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
