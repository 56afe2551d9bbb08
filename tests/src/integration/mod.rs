//! End-to-end router scenarios over the in-memory adapters.

pub mod dispatch_routing;
pub mod edge_cases;

use std::sync::Arc;
use version_router::prelude::*;

/// Admin identity used across the scenarios.
pub const ADMIN: Address = Address::new([0xAD; 20]);

/// An ordinary, non-admin caller.
pub const USER: Address = Address::new([0x55; 20]);

/// Deploys a fresh test router with a module at each given address.
pub async fn deploy_with(
    modules: Vec<(Address, Arc<dyn ImplementationModule>)>,
) -> TestRouter {
    let router = create_test_service(ADMIN).await;
    for (target, module) in modules {
        router.modules.deploy(target, module);
    }
    router
}

/// Shorthand for a distinct target address.
#[must_use]
pub fn target(n: u8) -> Address {
    Address::new([n; 20])
}
