//! # Design
//!
//! - Separate "not there yet" (`Waiting`) from "there but wrong" (`Config`);
//!   callers retry the former on their own cadence and surface the latter.
//! - `Connectivity` is only raised once the construction retries are spent.
//! - Constant messages; secret names and reasons travel as fields.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for connection bootstrap.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Errors raised while bootstrapping a store connection.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A prerequisite secret does not exist yet.
    #[error("waiting for prerequisite secret")]
    Waiting {
        /// Name of the missing secret.
        secret: String,
    },
    /// Credential or certificate material is malformed or incomplete.
    #[error("invalid connection material")]
    Config {
        /// Secret (or override) holding the material.
        secret: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// A secret could not be read from its source.
    #[error("failed to read secret")]
    SecretRead {
        /// Name of the secret being read.
        secret: String,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The HTTP client could not be constructed within the retry budget.
    #[error("log store client construction failed")]
    Connectivity {
        /// Number of attempts made.
        attempts: u32,
        /// Error of the final attempt.
        source: reqwest::Error,
    },
}

impl BootstrapError {
    pub(crate) fn config(secret: &str, reason: &'static str) -> Self {
        Self::Config {
            secret: secret.to_string(),
            reason,
        }
    }

    pub(crate) fn waiting(secret: &str) -> Self {
        Self::Waiting {
            secret: secret.to_string(),
        }
    }

    /// Whether the caller should retry later once secrets appear.
    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting { .. })
    }

    /// Whether the error reports malformed configuration.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}
