//! # Event Log Adapter
//!
//! In-memory append-only event log. Production deployments would publish
//! to the host's event bus instead.

use crate::events::RouterEvent;
use crate::ports::outbound::EventSink;
use std::sync::RwLock;

/// In-memory append-only event log.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<RouterEvent>>,
}

impl InMemoryEventLog {
    /// Create a new empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all appended events, in append order.
    #[must_use]
    pub fn events(&self) -> Vec<RouterEvent> {
        self.events.read().unwrap().clone()
    }

    /// Number of appended events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().unwrap().len()
    }

    /// Returns true if nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().unwrap().is_empty()
    }
}

impl EventSink for InMemoryEventLog {
    fn emit(&self, event: RouterEvent) {
        self.events.write().unwrap().push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================
