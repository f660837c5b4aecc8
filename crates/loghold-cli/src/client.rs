//! Connection context, settings loading, and CLI error types.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use loghold_policy::StorageSettings;
use loghold_store::{
    BootstrapError, Bootstrapper, ConnectionSettings, DirectorySecretSource, ElasticClient,
};
use reqwest::Url;

use crate::cli::Cli;

/// CLI-level error type separating bad input, missing prerequisites, and
/// operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Waiting(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::Waiting(_) => 4,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Waiting(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<BootstrapError> for CliError {
    fn from(err: BootstrapError) -> Self {
        match err {
            BootstrapError::Waiting { secret } => {
                Self::Waiting(format!("waiting for secret '{secret}' to be created"))
            }
            BootstrapError::Config { secret, reason } => {
                Self::Validation(format!("invalid connection material in '{secret}': {reason}"))
            }
            other => Self::failure(other),
        }
    }
}

/// Connection inputs gathered from flags and environment.
#[derive(Debug, Clone)]
pub(crate) struct AppContext {
    pub(crate) endpoint: Option<Url>,
    pub(crate) external: bool,
    pub(crate) secrets_dir: PathBuf,
    pub(crate) ca_override: Option<PathBuf>,
    pub(crate) timeout: Duration,
}

impl AppContext {
    pub(crate) fn from_cli(cli: &Cli) -> Self {
        Self {
            endpoint: cli.endpoint.clone(),
            external: cli.external,
            secrets_dir: cli.secrets_dir.clone(),
            ca_override: cli.ca_override.clone(),
            timeout: Duration::from_secs(cli.timeout),
        }
    }

    /// Bootstrap an authenticated store client from the mounted secrets.
    pub(crate) async fn connect(&self) -> CliResult<ElasticClient> {
        let endpoint = self.endpoint.clone().ok_or_else(|| {
            CliError::validation(
                "store endpoint is required (pass --endpoint or set LOGHOLD_ENDPOINT)",
            )
        })?;

        let mut settings = ConnectionSettings::new(endpoint);
        settings.external = self.external;
        settings.request_timeout = Some(self.timeout);
        if let Some(path) = &self.ca_override {
            let pem = tokio::fs::read(path).await.map_err(|err| {
                CliError::validation(format!(
                    "failed to read CA override {}: {err}",
                    path.display()
                ))
            })?;
            settings.ca_override = Some(pem);
        }

        let secrets = DirectorySecretSource::new(&self.secrets_dir);
        Bootstrapper::new(Arc::new(secrets))
            .connect(&settings)
            .await
            .map_err(CliError::from)
    }
}

/// Parse the store URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// Load storage settings from a JSON file; no file means defaults.
pub(crate) fn load_settings(path: Option<&Path>) -> CliResult<StorageSettings> {
    let Some(path) = path else {
        return Ok(StorageSettings::default());
    };

    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .map_err(CliError::failure)?;

    serde_json::from_str(&payload).map_err(|err| {
        CliError::validation(format!("settings file {} is not valid: {err}", path.display()))
    })
}

/// Resolve a principal password from the named environment variable.
pub(crate) fn resolve_password(
    variable: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> CliResult<String> {
    match lookup(variable) {
        Some(password) if !password.is_empty() => Ok(password),
        Some(_) => Err(CliError::validation(format!(
            "environment variable {variable} is empty"
        ))),
        None => Err(CliError::validation(format!(
            "environment variable {variable} is not set"
        ))),
    }
}
