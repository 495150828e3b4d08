//! Error taxonomy for the griddir workspace.
//!
//! Three conditions cross crate boundaries:
//!
//! - [`GridDirError::StorageUnavailable`] — the storage collaborator failed
//!   at the transport/connection level. Surfaced to the caller; the
//!   directory never retries (retry policy belongs to the collaborator).
//! - [`GridDirError::MalformedRecord`] — a storage batch decoded to garbage
//!   (row arity mismatch, wrong-typed cell, undecodable blob). The batch is
//!   rejected whole; corrupt storage must not read as "no regions".
//! - [`GridDirError::EstateUnresolvable`] — estate lookup failed. Estate-
//!   scoped operations map this to a fail-closed empty result; it never
//!   reaches the public API.
//!
//! Lookups that simply find nothing return `None` / an empty list, never an
//! error.

use thiserror::Error;

/// Convenience alias used across the workspace.
pub type Result<T, E = GridDirError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridDirError {
    /// Storage transport/connection failure.
    #[error("storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    /// A storage row batch failed to decode.
    #[error("malformed region record: {detail}")]
    MalformedRecord { detail: String },

    /// The estate collaborator could not resolve an estate.
    #[error("estate {estate_id} unresolvable")]
    EstateUnresolvable { estate_id: u32 },
}

impl GridDirError {
    /// Shorthand for [`GridDirError::StorageUnavailable`].
    #[must_use]
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`GridDirError::MalformedRecord`].
    #[must_use]
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedRecord {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridDirError::storage("connection refused");
        assert_eq!(err.to_string(), "storage unavailable: connection refused");

        let err = GridDirError::malformed("row arity 13");
        assert!(err.to_string().contains("row arity 13"));

        let err = GridDirError::EstateUnresolvable { estate_id: 9 };
        assert_eq!(err.to_string(), "estate 9 unresolvable");
    }

    #[test]
    fn test_shorthands_build_expected_variants() {
        assert!(matches!(
            GridDirError::storage("x"),
            GridDirError::StorageUnavailable { .. }
        ));
        assert!(matches!(
            GridDirError::malformed("x"),
            GridDirError::MalformedRecord { .. }
        ));
    }
}
