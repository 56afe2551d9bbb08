//! # Module Store Adapter
//!
//! In-memory module resolver: stands in for the environment's code store.
//! Tests "deploy" module values here and hand out their addresses as
//! registration targets.

use crate::domain::value_objects::Address;
use crate::ports::outbound::{ImplementationModule, ModuleResolver};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory code store mapping addresses to module capabilities.
#[derive(Default)]
pub struct InMemoryModuleStore {
    modules: RwLock<HashMap<Address, Arc<dyn ImplementationModule>>>,
}

impl InMemoryModuleStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a module at `target`, replacing whatever was there.
    pub fn deploy(&self, target: Address, module: Arc<dyn ImplementationModule>) {
        self.modules.write().unwrap().insert(target, module);
    }

    /// Removes the code at `target`, leaving any registrations pointing at
    /// it dangling.
    pub fn remove_code(&self, target: Address) {
        self.modules.write().unwrap().remove(&target);
    }

    /// Number of deployed modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.read().unwrap().len()
    }

    /// Returns true if nothing is deployed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.read().unwrap().is_empty()
    }
}

impl ModuleResolver for InMemoryModuleStore {
    fn resolve(&self, target: Address) -> Option<Arc<dyn ImplementationModule>> {
        self.modules.read().unwrap().get(&target).map(Arc::clone)
    }
}

// =============================================================================
// TESTS
// =============================================================================
