//! # Design
//!
//! - Reject invalid input before any remote call is made.
//! - Carry the name of the role or principal being touched as a field.

use loghold_core::RemoteError;
use thiserror::Error;

/// Result alias for access provisioning.
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors raised while provisioning principals and roles.
#[derive(Debug, Error)]
pub enum AccessError {
    /// A role could not be sent to the store as given.
    #[error("invalid role")]
    InvalidRole {
        /// Static reason for the rejection.
        reason: &'static str,
    },
    /// A remote call failed.
    #[error("access operation failed")]
    Remote {
        /// Operation identifier.
        operation: &'static str,
        /// Role or principal name involved.
        name: String,
        /// Underlying store error.
        source: RemoteError,
    },
}

impl AccessError {
    pub(crate) fn remote(operation: &'static str, name: &str, source: RemoteError) -> Self {
        Self::Remote {
            operation,
            name: name.to_string(),
            source,
        }
    }
}
