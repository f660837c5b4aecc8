//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use loghold_telemetry::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, TelemetryError, init_logging, pass_span,
};
use reqwest::Url;
use tracing::{Instrument, info, warn};
use uuid::Uuid;

use crate::client::{AppContext, CliResult, parse_url};
use crate::commands::policies::{handle_policies_apply, handle_policies_plan};
use crate::commands::principals::{
    handle_principals_list, handle_principals_provision, handle_principals_retract,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SECRETS_DIR: &str = "/var/run/secrets/loghold";
const DEFAULT_PASSWORD_ENV: &str = "LOGHOLD_PRINCIPAL_PASSWORD";

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let logging = LoggingConfig {
        level: DEFAULT_LOG_LEVEL,
        format: cli.log_format.unwrap_or_else(LogFormat::infer),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err}");
    }

    let command = command_label(&cli.command);
    let pass_id = Uuid::new_v4();
    let result = dispatch(cli).instrument(pass_span(command, pass_id)).await;

    match result {
        Ok(()) => {
            info!(command, %pass_id, "pass completed");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            let message = err.display_message();
            warn!(command, %pass_id, exit_code, "pass failed");
            eprintln!("error: {message}");
            exit_code
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let ctx = AppContext::from_cli(&cli);

    match cli.command {
        Command::Policies(policies) => match policies {
            PolicyCommand::Apply(args) => handle_policies_apply(&ctx, &args, cli.output).await,
            PolicyCommand::Plan(args) => handle_policies_plan(&args, cli.output),
        },
        Command::Principals(principals) => match principals {
            PrincipalCommand::List => handle_principals_list(&ctx, cli.output).await,
            PrincipalCommand::Provision(args) => handle_principals_provision(&ctx, &args).await,
            PrincipalCommand::Retract(args) => handle_principals_retract(&ctx, &args).await,
        },
    }
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Policies(PolicyCommand::Apply(_)) => "policies apply",
        Command::Policies(PolicyCommand::Plan(_)) => "policies plan",
        Command::Principals(PrincipalCommand::List) => "principals list",
        Command::Principals(PrincipalCommand::Provision(_)) => "principals provision",
        Command::Principals(PrincipalCommand::Retract(_)) => "principals retract",
    }
}

fn parse_log_format(input: &str) -> Result<LogFormat, String> {
    input
        .parse()
        .map_err(|err: TelemetryError| format!("{err}: '{input}' (expected json or pretty)"))
}

#[derive(Parser)]
#[command(
    name = "loghold",
    about = "Retention and access reconciliation for the log store"
)]
pub(crate) struct Cli {
    #[arg(long, global = true, env = "LOGHOLD_ENDPOINT", value_parser = parse_url)]
    pub(crate) endpoint: Option<Url>,
    #[arg(
        long,
        global = true,
        env = "LOGHOLD_EXTERNAL",
        help = "Connect to a store outside the cluster (external CA and mTLS client certificate)"
    )]
    pub(crate) external: bool,
    #[arg(
        long,
        global = true,
        env = "LOGHOLD_SECRETS_DIR",
        default_value = DEFAULT_SECRETS_DIR
    )]
    pub(crate) secrets_dir: PathBuf,
    #[arg(long, global = true, env = "LOGHOLD_CA_OVERRIDE")]
    pub(crate) ca_override: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "LOGHOLD_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub(crate) timeout: u64,
    #[arg(long, global = true, env = "LOGHOLD_LOG_FORMAT", value_parser = parse_log_format)]
    pub(crate) log_format: Option<LogFormat>,
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    #[command(subcommand)]
    Policies(PolicyCommand),
    #[command(subcommand)]
    Principals(PrincipalCommand),
}

#[derive(Subcommand)]
pub(crate) enum PolicyCommand {
    /// Reconcile lifecycle policies for every log category.
    Apply(SettingsArgs),
    /// Print the computed lifecycle thresholds without contacting the store.
    Plan(SettingsArgs),
}

#[derive(Subcommand)]
pub(crate) enum PrincipalCommand {
    /// List principals and their roles.
    List,
    /// Create the well-known principals for a cluster.
    Provision(ProvisionArgs),
    /// Delete the well-known principals of a cluster.
    Retract(TargetArgs),
}

#[derive(Args)]
pub(crate) struct SettingsArgs {
    #[arg(long, help = "JSON file with storage_bytes and retention settings")]
    pub(crate) settings: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct TargetArgs {
    #[arg(long)]
    pub(crate) cluster: String,
    #[arg(long, default_value = "")]
    pub(crate) tenant: String,
}

#[derive(Args)]
pub(crate) struct ProvisionArgs {
    #[command(flatten)]
    pub(crate) target: TargetArgs,
    #[arg(
        long,
        default_value = DEFAULT_PASSWORD_ENV,
        help = "Environment variable holding the principal password"
    )]
    pub(crate) password_env: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}
