//! Connection bootstrap: secrets in, authenticated [`ElasticClient`] out.
//!
//! # Design
//! - Resolution is pure lookup and parsing; nothing touches the network.
//! - Missing credential or CA secrets report [`BootstrapError::Waiting`] so the
//!   caller can come back later. Malformed material, and the missing mTLS
//!   secret in external mode, are configuration errors.
//! - TLS material is loaded once during resolution so that certificates the
//!   TLS stack rejects surface as configuration errors.
//! - Only client construction runs under the [`RetryPolicy`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::client::ElasticClient;
use crate::credentials::{Credentials, TlsMaterial, parse_identity, parse_roots};
use crate::error::{BootstrapError, BootstrapResult};
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper, retry_construct};
use crate::secrets::{
    ADMIN_CREDENTIALS_SECRET, CA_CERT_KEY, CLIENT_CERT_SECRET, EXTERNAL_CA_SECRET,
    INTERNAL_CA_SECRET, SecretSource,
};

/// Origin label used in errors about the operator supplied CA.
const CA_OVERRIDE_ORIGIN: &str = "ca-override";

/// Where and how to reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Base URL of the store.
    pub endpoint: Url,
    /// Whether the store runs outside the cluster (selects the external CA and
    /// requires mTLS client material).
    pub external: bool,
    /// PEM bundle replacing the CA secret when set.
    pub ca_override: Option<Vec<u8>>,
    /// Per-request timeout applied to the HTTP client.
    pub request_timeout: Option<Duration>,
}

impl ConnectionSettings {
    /// In-cluster settings for `endpoint` with no overrides.
    #[must_use]
    pub const fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            external: false,
            ca_override: None,
            request_timeout: None,
        }
    }
}

/// Credentials and TLS material resolved for one connection.
#[derive(Debug, Clone)]
pub struct ConnectionMaterial {
    /// Basic-auth credentials.
    pub credentials: Credentials,
    /// Trust roots and optional client identity.
    pub tls: TlsMaterial,
}

/// Resolves connection material from a [`SecretSource`] and builds clients.
#[derive(Clone)]
pub struct Bootstrapper {
    secrets: Arc<dyn SecretSource>,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl Bootstrapper {
    /// Bootstrapper reading from `secrets` with the default retry policy.
    #[must_use]
    pub fn new(secrets: Arc<dyn SecretSource>) -> Self {
        Self {
            secrets,
            retry: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the construction retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the time source used between construction attempts.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Resolve credentials and TLS material for `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Waiting`] when the credential or CA secret does
    /// not exist yet, [`BootstrapError::Config`] when material is malformed or
    /// the mTLS secret is missing in external mode, and
    /// [`BootstrapError::SecretRead`] when the source cannot be read.
    pub async fn resolve(
        &self,
        settings: &ConnectionSettings,
    ) -> BootstrapResult<ConnectionMaterial> {
        let credentials_secret = self
            .secrets
            .secret(ADMIN_CREDENTIALS_SECRET)
            .await?
            .ok_or_else(|| BootstrapError::waiting(ADMIN_CREDENTIALS_SECRET))?;
        let credentials = Credentials::from_secret(&credentials_secret)?;

        let (roots_origin, roots) = if let Some(pem) = &settings.ca_override {
            (CA_OVERRIDE_ORIGIN, parse_roots(CA_OVERRIDE_ORIGIN, pem)?)
        } else {
            let name = if settings.external {
                EXTERNAL_CA_SECRET
            } else {
                INTERNAL_CA_SECRET
            };
            let secret = self
                .secrets
                .secret(name)
                .await?
                .ok_or_else(|| BootstrapError::waiting(name))?;
            let pem = secret
                .get(CA_CERT_KEY)
                .ok_or_else(|| BootstrapError::config(name, "missing_ca_certificate"))?;
            (name, parse_roots(name, pem)?)
        };
        let mut tls = TlsMaterial {
            roots,
            identity: None,
        };
        check_tls(&tls, roots_origin, "invalid_certificate")?;

        if settings.external {
            let secret = self
                .secrets
                .secret(CLIENT_CERT_SECRET)
                .await?
                .ok_or_else(|| {
                    BootstrapError::config(CLIENT_CERT_SECRET, "missing_client_secret")
                })?;
            tls.identity = Some(parse_identity(&secret)?);
            check_tls(&tls, CLIENT_CERT_SECRET, "invalid_client_identity")?;
        }

        Ok(ConnectionMaterial { credentials, tls })
    }

    /// Resolve material and construct an authenticated client, retrying
    /// construction per the configured [`RetryPolicy`].
    ///
    /// # Errors
    ///
    /// Returns the resolution errors of [`Self::resolve`], or
    /// [`BootstrapError::Connectivity`] once every construction attempt failed.
    pub async fn connect(&self, settings: &ConnectionSettings) -> BootstrapResult<ElasticClient> {
        let material = self.resolve(settings).await?;

        let http = retry_construct(self.retry, self.sleeper.as_ref(), |attempt| {
            debug!(attempt, endpoint = %settings.endpoint, "building log store client");
            build_http_client(&material.tls, settings.request_timeout)
        })
        .await
        .map_err(|exhausted| BootstrapError::Connectivity {
            attempts: exhausted.attempts,
            source: exhausted.last_error,
        })?;

        info!(
            endpoint = %settings.endpoint,
            external = settings.external,
            username = %material.credentials.username,
            "log store client ready"
        );
        Ok(ElasticClient::new(
            http,
            settings.endpoint.clone(),
            material.credentials,
        ))
    }
}

/// Load `tls` into a throwaway client and report rejection as a config error.
fn check_tls(tls: &TlsMaterial, origin: &str, reason: &'static str) -> BootstrapResult<()> {
    build_http_client(tls, None).map_err(|err| {
        warn!(secret = origin, reason, error = %err, "tls material rejected");
        BootstrapError::config(origin, reason)
    })?;
    Ok(())
}

/// Build a rustls-backed HTTP client trusting only `tls.roots`, presenting the
/// client identity when present, and never reusing idle connections.
///
/// # Errors
///
/// Returns the builder error when the TLS material is rejected.
pub fn build_http_client(tls: &TlsMaterial, timeout: Option<Duration>) -> reqwest::Result<Client> {
    let mut builder = Client::builder()
        .use_rustls_tls()
        .tls_built_in_root_certs(false)
        .pool_max_idle_per_host(0);

    for root in &tls.roots {
        builder = builder.add_root_certificate(root.clone());
    }
    if let Some(identity) = &tls.identity {
        builder = builder.identity(identity.clone());
    }
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build()
}
