//! # Event Schema
//!
//! Observable events appended by registry mutations, plus the message
//! payloads the service handlers accept and produce. Payloads are wrapped
//! in a transport envelope by the host; identity comes from the envelope,
//! never from payload fields.

use crate::domain::value_objects::{Address, Bytes, VersionId, U256};
use serde::{Deserialize, Serialize};

// =============================================================================
// OBSERVABLE EVENTS (append-only log)
// =============================================================================

/// Events appended to the router's observable log.
///
/// The log is append-only and not queryable from inside the router.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouterEvent {
    /// A version was registered.
    VersionRegistered {
        /// The registered identifier.
        version: VersionId,
        /// Its implementation target.
        target: Address,
    },
    /// The default version changed (old may equal new when the default is
    /// re-set to its current value).
    DefaultVersionChanged {
        /// Default before the change.
        old_version: VersionId,
        /// Default after the change.
        new_version: VersionId,
    },
}

// =============================================================================
// INBOUND PAYLOADS (administrative)
// =============================================================================

/// Request to register a version.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterVersionRequestPayload {
    /// Version identifier to register.
    pub version: VersionId,
    /// Implementation target; must have resolvable code.
    pub target: Address,
}

/// Request to remove a version.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoveVersionRequestPayload {
    /// Version identifier to remove.
    pub version: VersionId,
}

/// Request to change the default version.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetDefaultVersionRequestPayload {
    /// Version identifier to make the default.
    pub version: VersionId,
}

/// Acknowledgement for an administrative mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MutationResponsePayload {
    /// Whether the mutation was applied.
    pub success: bool,
    /// Failure description when not applied.
    pub error: Option<String>,
}

// =============================================================================
// INBOUND PAYLOADS (dispatch)
// =============================================================================

/// Request to execute at an explicitly pinned version.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecuteAtVersionRequestPayload {
    /// Version identifier to dispatch to.
    pub version: VersionId,
    /// Call payload, forwarded verbatim.
    pub payload: Bytes,
    /// Attached value.
    pub value: U256,
}

/// Request carrying raw input for the fallback path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawCallRequestPayload {
    /// Entire original input buffer, forwarded verbatim to the default.
    pub input: Bytes,
    /// Attached value.
    pub value: U256,
}

/// Response for a forwarded call.
///
/// `output` carries the target's raw bytes unchanged: return data on
/// success, revert payload on failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecuteResponsePayload {
    /// Whether the forwarded call succeeded.
    pub success: bool,
    /// Raw output or revert payload, relayed byte-for-byte.
    pub output: Bytes,
}

// =============================================================================
// EVENT TOPICS
// =============================================================================

/// Topics for the router's message surface.
pub mod topics {
    /// Topic for administrative registration requests.
    pub const REGISTER_VERSION_REQUEST: &str = "router.version.register.request";

    /// Topic for administrative removal requests.
    pub const REMOVE_VERSION_REQUEST: &str = "router.version.remove.request";

    /// Topic for default-change requests.
    pub const SET_DEFAULT_VERSION_REQUEST: &str = "router.version.default.request";

    /// Topic for routed execution requests.
    pub const EXECUTE_AT_VERSION_REQUEST: &str = "router.execute.request";

    /// Topic for fallback (raw input) requests.
    pub const RAW_CALL_REQUEST: &str = "router.fallback.request";

    /// Topic carrying the append-only event log.
    pub const EVENTS: &str = "router.events";
}

// =============================================================================
// TESTS
// =============================================================================
