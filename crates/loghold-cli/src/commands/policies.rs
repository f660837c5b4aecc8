use loghold_policy::{PolicyError, PolicyReconciler, RetentionPlan};
use tracing::info;

use crate::cli::{OutputFormat, SettingsArgs};
use crate::client::{AppContext, CliError, CliResult, load_settings};
use crate::output::{render_outcomes, render_plan};

pub(crate) fn handle_policies_plan(args: &SettingsArgs, format: OutputFormat) -> CliResult<()> {
    let settings = load_settings(args.settings.as_deref())?;
    render_plan(&RetentionPlan::from_settings(&settings), format)
}

pub(crate) async fn handle_policies_apply(
    ctx: &AppContext,
    args: &SettingsArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let settings = load_settings(args.settings.as_deref())?;
    let plan = RetentionPlan::from_settings(&settings);
    let client = ctx.connect().await?;

    let outcomes = PolicyReconciler::new(&client)
        .reconcile(&plan)
        .await
        .map_err(policy_failure)?;

    let written = outcomes.iter().filter(|o| o.outcome.wrote()).count();
    info!(
        policies = outcomes.len(),
        written, "lifecycle policies reconciled"
    );
    render_outcomes(&outcomes, format)
}

fn policy_failure(err: PolicyError) -> CliError {
    let PolicyError::Remote { policy, .. } = &err;
    let message = format!("failed to reconcile lifecycle policy {policy}");
    CliError::failure(anyhow::Error::new(err).context(message))
}
