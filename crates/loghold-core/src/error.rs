//! # Design
//!
//! - Classify every remote failure once, at the store boundary.
//! - `NotFound` is a signal rather than a failure; callers branch on it.
//! - Keep messages constant and carry the operation and resource name as fields.

use std::error::Error;

use thiserror::Error;

/// Result alias for remote store operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failures reported by a remote log store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The addressed resource does not exist.
    #[error("remote resource not found")]
    NotFound {
        /// Operation identifier.
        operation: &'static str,
        /// Name of the missing resource.
        name: String,
    },
    /// The store answered with a non-success status.
    #[error("remote api request failed")]
    Api {
        /// Operation identifier.
        operation: &'static str,
        /// HTTP status code returned by the store.
        status: u16,
        /// Response body as returned by the store.
        body: String,
    },
    /// The request could not be delivered or the response could not be read.
    #[error("remote transport failure")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying transport failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The store returned a payload that does not match the expected schema.
    #[error("remote payload could not be decoded")]
    Decode {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying decoding error.
        source: serde_json::Error,
    },
    /// A request URL could not be derived from the configured endpoint.
    #[error("invalid remote endpoint")]
    InvalidEndpoint {
        /// Operation identifier.
        operation: &'static str,
        /// Endpoint that could not be extended.
        endpoint: String,
    },
}

impl RemoteError {
    /// Returns `true` when the error reports a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Operation identifier attached to the error.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::NotFound { operation, .. }
            | Self::Api { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Decode { operation, .. }
            | Self::InvalidEndpoint { operation, .. } => operation,
        }
    }

    /// Wrap a transport-level failure.
    pub fn transport(
        operation: &'static str,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            operation,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_classified_separately() {
        let missing = RemoteError::NotFound {
            operation: "ilm.get",
            name: "tigera_secure_ee_flows_policy".to_string(),
        };
        assert!(missing.is_not_found());
        assert_eq!(missing.operation(), "ilm.get");

        let api = RemoteError::Api {
            operation: "ilm.put",
            status: 500,
            body: "boom".to_string(),
        };
        assert!(!api.is_not_found());
        assert_eq!(api.operation(), "ilm.put");
    }

    #[test]
    fn transport_keeps_source() {
        let err = RemoteError::transport("user.list", std::io::Error::other("reset"));
        assert!(matches!(err, RemoteError::Transport { .. }));
        assert!(err.source().is_some());
    }
}
