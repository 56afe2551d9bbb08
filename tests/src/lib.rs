//! # Version-Router Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── modules.rs        # Fixture implementation modules
//! │
//! └── integration/      # End-to-end router scenarios
//!     ├── registry_lifecycle.rs
//!     ├── dispatch_routing.rs
//!     ├── shared_state.rs
//!     └── edge_cases.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p vr-tests
//!
//! # By category
//! cargo test -p vr-tests integration::registry_lifecycle::
//! cargo test -p vr-tests integration::shared_state::
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
pub mod modules;
