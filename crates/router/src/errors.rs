//! # Error Types
//!
//! All error types for the versioned router. Every failure is terminal and
//! surfaced immediately to the direct caller; nothing is retried or
//! downgraded internally.

use crate::domain::value_objects::{Address, Bytes, VersionId};
use thiserror::Error;

// =============================================================================
// ROUTER ERRORS
// =============================================================================

/// Errors surfaced at the router boundary.
///
/// These are distinct, named failure signals so calling code can branch on
/// failure kind rather than parsing error strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A registry mutation was attempted by a non-admin caller.
    #[error("unauthorized caller: {0}")]
    UnauthorizedCaller(Address),

    /// A lookup, removal, default-set, or dispatch referenced an absent version.
    #[error("version not found: {0}")]
    VersionNotFound(VersionId),

    /// Registration collided with an existing version identifier.
    #[error("version already exists: {0}")]
    VersionAlreadyExists(VersionId),

    /// Registration target was the zero address or had no resolvable code.
    #[error("invalid implementation target")]
    InvalidImplementation,

    /// A forwarded call failed without supplying a revert payload.
    #[error("forwarded call failed")]
    CallFailed,

    /// Attempted removal of the currently active default version.
    #[error("cannot remove the current default version")]
    CannotRemoveDefaultVersion,

    /// A forwarded call reverted with a payload, carried byte-for-byte.
    #[error("forwarded call reverted with {} payload bytes", .0.len())]
    TargetReverted(Bytes),

    /// Nested dispatch exceeded the configured call depth.
    #[error("call depth exceeded: {depth} > {max}")]
    CallDepthExceeded {
        /// Depth the rejected call would have run at.
        depth: u16,
        /// Configured maximum.
        max: u16,
    },

    /// Slot storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RouterError {
    /// Wraps a forwarded-call failure, preserving the revert payload
    /// byte-for-byte when the target supplied one.
    #[must_use]
    pub fn from_revert(payload: Bytes) -> Self {
        if payload.is_empty() {
            Self::CallFailed
        } else {
            Self::TargetReverted(payload)
        }
    }

    /// Returns the verbatim revert payload, if this failure carries one.
    #[must_use]
    pub fn revert_payload(&self) -> Option<&Bytes> {
        match self {
            Self::TargetReverted(payload) => Some(payload),
            _ => None,
        }
    }

    /// Returns true if this failure originated inside a forwarded target
    /// rather than in the router itself.
    #[must_use]
    pub fn is_forwarded_failure(&self) -> bool {
        matches!(self, Self::CallFailed | Self::TargetReverted(_))
    }
}

// =============================================================================
// STORAGE ERRORS
// =============================================================================

/// Errors from the slot storage port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage backend unavailable.
    #[error("slot storage unavailable")]
    Unavailable,

    /// Storage backend is corrupted.
    #[error("slot storage corruption detected")]
    Corrupted,

    /// Other storage error.
    #[error("storage error: {0}")]
    Other(String),
}

// =============================================================================
// TESTS
// =============================================================================
