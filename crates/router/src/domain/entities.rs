//! # Core Domain Entities
//!
//! Main business entities for versioned dispatch: the call context handed
//! to forwarded modules, the tagged outcome of a forwarded call, and the
//! router configuration.

use crate::domain::value_objects::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// CALL CONTEXT
// =============================================================================

/// Context handed to a forwarded implementation module.
///
/// Forwarding uses delegate semantics: the module observes the *original*
/// caller identity and attached value, and `address` is always the router
/// itself, never the module's own address.
#[derive(Clone, Debug)]
pub struct CallContext {
    /// External account that initiated the call chain.
    pub origin: Address,
    /// Caller as observed by the module (preserved across forwarding).
    pub caller: Address,
    /// Executing address: the router, whose state the module runs against.
    pub address: Address,
    /// Value attached to the call.
    pub value: U256,
    /// Input bytes, forwarded verbatim.
    pub data: Bytes,
    /// Call depth (0 for external calls, incremented on re-entry).
    pub depth: u16,
}

impl CallContext {
    /// Creates a context for an external call arriving at the router.
    #[must_use]
    pub fn new_external(caller: Address, router: Address, value: U256, data: Bytes) -> Self {
        Self {
            origin: caller,
            caller,
            address: router,
            value,
            data,
            depth: 0,
        }
    }

    /// Creates a child context for a nested delegate dispatch.
    ///
    /// Preserves origin, caller, executing address, and value; only the
    /// payload and depth change.
    #[must_use]
    pub fn child_delegate(&self, data: Bytes) -> Self {
        Self {
            origin: self.origin,
            caller: self.caller,
            address: self.address,
            value: self.value,
            data,
            depth: self.depth.saturating_add(1),
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self {
            origin: Address::ZERO,
            caller: Address::ZERO,
            address: Address::ZERO,
            value: U256::zero(),
            data: Bytes::new(),
            depth: 0,
        }
    }
}

// =============================================================================
// CALL OUTCOME
// =============================================================================

/// Tagged result of executing a forwarded module.
///
/// The tag and payload cross the dispatch boundary unchanged: success
/// output is returned byte-for-byte, and a revert payload is re-raised
/// byte-for-byte to preserve caller-visible diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallOutcome {
    /// Module completed; carries its raw output bytes.
    Success(Bytes),
    /// Module failed; carries its raw revert payload (possibly empty).
    Revert(Bytes),
}

impl CallOutcome {
    /// Creates a success outcome from raw output bytes.
    #[must_use]
    pub fn success(output: impl Into<Bytes>) -> Self {
        Self::Success(output.into())
    }

    /// Creates a revert outcome from a raw failure payload.
    #[must_use]
    pub fn revert(payload: impl Into<Bytes>) -> Self {
        Self::Revert(payload.into())
    }

    /// Creates a revert outcome with no payload.
    #[must_use]
    pub fn revert_empty() -> Self {
        Self::Revert(Bytes::new())
    }

    /// Returns true if the module completed successfully.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the carried bytes, success output or revert payload alike.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        match self {
            Self::Success(bytes) | Self::Revert(bytes) => bytes,
        }
    }
}

// =============================================================================
// RELAYED OUTCOME (fallback path)
// =============================================================================

/// Terminal result of a fallback call.
///
/// The fallback path relays whatever the resolved default produced to the
/// original caller unchanged; nothing in the router inspects it afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayedOutcome {
    /// Whether the forwarded default succeeded.
    pub success: bool,
    /// Raw output bytes on success, raw failure payload otherwise.
    pub payload: Bytes,
}

impl RelayedOutcome {
    /// Builds the relay from a forwarded call outcome, preserving the tag
    /// and payload verbatim.
    #[must_use]
    pub fn from_outcome(outcome: CallOutcome) -> Self {
        match outcome {
            CallOutcome::Success(payload) => Self {
                success: true,
                payload,
            },
            CallOutcome::Revert(payload) => Self {
                success: false,
                payload,
            },
        }
    }
}

// =============================================================================
// ROUTER CONFIGURATION
// =============================================================================

/// Router configuration.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// The router's own address, preserved as the executing address in
    /// every forwarded call context.
    pub router_address: Address,
    /// Maximum nested dispatch depth.
    pub max_call_depth: u16,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            router_address: Address::ZERO,
            max_call_depth: 64,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
