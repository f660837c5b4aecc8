//! Subscriber installation and per-pass spans.
//!
//! # Design
//! - A single entry point installs an `EnvFilter` plus a JSON or pretty fmt layer.
//! - `RUST_LOG` takes precedence over the configured level.
//! - The installed format is recorded once; later calls are no-ops.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use once_cell::sync::OnceCell;
use tracing::{Span, info_span};
use tracing_subscriber::fmt::layer as fmt_layer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use crate::error::{Result, TelemetryError};

/// Default logging target when `RUST_LOG` is not provided.
pub const DEFAULT_LOG_LEVEL: &str = "info";

static ACTIVE_FORMAT: OnceCell<LogFormat> = OnceCell::new();

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level directive (e.g., `info`, `loghold_policy=debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable, pretty-printed logs.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }

    /// Stable name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        }
    }
}

impl Display for LogFormat {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(TelemetryError::UnknownFormat {
                value: value.to_string(),
            }),
        }
    }
}

/// Configure and install the global tracing subscriber.
///
/// Calling this again after a successful install leaves the first subscriber
/// in place and returns `Ok(())`.
///
/// # Errors
///
/// Returns an error if another subscriber has already been set globally.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    ACTIVE_FORMAT.get_or_try_init(|| install_fmt_subscriber(config).map(|()| config.format))?;
    Ok(())
}

/// Format installed by [`init_logging`], if it has run.
#[must_use]
pub fn active_format() -> Option<LogFormat> {
    ACTIVE_FORMAT.get().copied()
}

/// Root span for one CLI pass, tagging every event with the pass identifier.
#[must_use]
pub fn pass_span(command: &str, pass_id: Uuid) -> Span {
    info_span!("pass", command, pass_id = %pass_id)
}

fn install_fmt_subscriber(config: &LoggingConfig) -> Result<()> {
    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(build_env_filter(config.level))
            .with(fmt_layer().json().with_target(true).with_current_span(true))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(build_env_filter(config.level))
            .with(fmt_layer().with_target(false).with_thread_ids(false))
            .try_init(),
    };
    installed.map_err(|source| TelemetryError::SubscriberInstall { source })
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
