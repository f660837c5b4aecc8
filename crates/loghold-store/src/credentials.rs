//! Credential and TLS material resolved from secrets.

use std::fmt::{self, Debug, Formatter};

use reqwest::{Certificate, Identity};

use crate::error::{BootstrapError, BootstrapResult};
use crate::secrets::{CLIENT_CERT_KEY, CLIENT_KEY_KEY, Secret};

/// Basic-auth credentials for the store.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Read credentials from a secret holding exactly one `username: password`
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Config`] when the secret does not hold exactly
    /// one entry, when the password is not UTF-8, or when the username or
    /// password is empty.
    pub fn from_secret(secret: &Secret) -> BootstrapResult<Self> {
        let mut entries = secret.entries();
        let (Some((username, password)), None) = (entries.next(), entries.next()) else {
            return Err(BootstrapError::config(
                secret.name(),
                "expected_single_entry",
            ));
        };

        let password = String::from_utf8(password.to_vec())
            .map_err(|_| BootstrapError::config(secret.name(), "non_utf8_password"))?;
        if username.is_empty() || password.is_empty() {
            return Err(BootstrapError::config(secret.name(), "empty_credentials"));
        }

        Ok(Self {
            username: username.to_string(),
            password,
        })
    }
}

impl Debug for Credentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Trust roots and optional client identity installed on the transport.
#[derive(Clone)]
pub struct TlsMaterial {
    /// CA certificates trusted for the store's server certificate.
    pub roots: Vec<Certificate>,
    /// Client certificate presented for mutual TLS.
    pub identity: Option<Identity>,
}

impl Debug for TlsMaterial {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TlsMaterial")
            .field("roots", &self.roots.len())
            .field("identity", &self.identity.is_some())
            .finish()
    }
}

/// Parse a PEM bundle of trusted CA certificates.
///
/// # Errors
///
/// Returns [`BootstrapError::Config`] when the bundle holds no certificate.
pub fn parse_roots(origin: &str, pem: &[u8]) -> BootstrapResult<Vec<Certificate>> {
    match Certificate::from_pem_bundle(pem) {
        Ok(roots) if !roots.is_empty() => Ok(roots),
        _ => Err(BootstrapError::config(origin, "invalid_certificate")),
    }
}

/// Build the mTLS client identity from the certificate and key of `secret`.
///
/// # Errors
///
/// Returns [`BootstrapError::Config`] when either field is missing or the pair
/// cannot be parsed.
pub fn parse_identity(secret: &Secret) -> BootstrapResult<Identity> {
    let cert = secret
        .get(CLIENT_CERT_KEY)
        .ok_or_else(|| BootstrapError::config(secret.name(), "missing_client_certificate"))?;
    let key = secret
        .get(CLIENT_KEY_KEY)
        .ok_or_else(|| BootstrapError::config(secret.name(), "missing_client_key"))?;

    let mut pem = Vec::with_capacity(cert.len() + key.len() + 1);
    pem.extend_from_slice(cert);
    pem.push(b'\n');
    pem.extend_from_slice(key);

    Identity::from_pem(&pem)
        .map_err(|_| BootstrapError::config(secret.name(), "invalid_client_identity"))
}
