//! # Ports Layer
//!
//! Hexagonal architecture ports:
//! - `inbound`: the public router API (driving side)
//! - `outbound`: storage, module resolution, and event sinking (driven side)

pub mod inbound;
pub mod outbound;
