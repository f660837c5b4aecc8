//! # Design
//!
//! - Tie every remote failure to the policy it was reconciling.
//! - Keep the store error as the source; do not flatten it into the message.

use loghold_core::RemoteError;
use thiserror::Error;

/// Result alias for policy reconciliation.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Errors raised while reconciling lifecycle policies.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A remote call failed for a reason other than a missing policy.
    #[error("lifecycle policy operation failed")]
    Remote {
        /// Operation identifier.
        operation: &'static str,
        /// Policy being reconciled.
        policy: String,
        /// Underlying store error.
        source: RemoteError,
    },
}

impl PolicyError {
    pub(crate) fn remote(operation: &'static str, policy: &str, source: RemoteError) -> Self {
        Self::Remote {
            operation,
            policy: policy.to_string(),
            source,
        }
    }
}
