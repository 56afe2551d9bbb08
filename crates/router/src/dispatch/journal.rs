//! # Storage Journal
//!
//! Per-call write journal over the slot storage port. Writes made during a
//! forwarded call land in the journal's overlay and are applied to the
//! underlying storage only when the call succeeds; dropping the journal
//! discards them. Re-entrant sub-calls share the outer call's journal, so
//! a failing call undoes everything it touched as one unit.

use crate::domain::value_objects::{SlotKey, SlotValue};
use crate::errors::StorageError;
use crate::ports::outbound::SlotStorage;
use std::collections::HashMap;

/// Journal of pending slot writes for one external call.
pub struct StorageJournal<'a> {
    /// Committed storage underneath the overlay.
    base: &'a dyn SlotStorage,
    /// Pending writes; reads go through the overlay first.
    overlay: HashMap<SlotKey, SlotValue>,
}

impl<'a> StorageJournal<'a> {
    /// Opens an empty journal over `base`.
    #[must_use]
    pub fn new(base: &'a dyn SlotStorage) -> Self {
        Self {
            base,
            overlay: HashMap::new(),
        }
    }

    /// Reads a slot: pending write if present, committed value otherwise.
    pub async fn load(&self, key: SlotKey) -> Result<SlotValue, StorageError> {
        if let Some(value) = self.overlay.get(&key) {
            return Ok(*value);
        }
        self.base.get_slot(key).await
    }

    /// Records a pending write.
    pub fn store(&mut self, key: SlotKey, value: SlotValue) {
        self.overlay.insert(key, value);
    }

    /// Number of slots with pending writes.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.overlay.len()
    }

    /// Applies all pending writes to the underlying storage and consumes
    /// the journal. Returns the number of slots written.
    pub async fn commit(self) -> Result<usize, StorageError> {
        let count = self.overlay.len();
        for (key, value) in self.overlay {
            self.base.set_slot(key, value).await?;
        }
        Ok(count)
    }
}

// =============================================================================
// TESTS
// =============================================================================
