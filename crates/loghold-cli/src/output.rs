//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use loghold_access::Principal;
use loghold_policy::{CategoryOutcome, PolicyOutcome, RetentionPlan};
use serde_json::{Value, json};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_plan(plan: &RetentionPlan, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&plan_json(plan)),
        OutputFormat::Table => {
            print!("{}", plan_table(plan));
            Ok(())
        }
    }
}

pub(crate) fn render_outcomes(outcomes: &[CategoryOutcome], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&outcomes_json(outcomes)),
        OutputFormat::Table => {
            print!("{}", outcomes_table(outcomes));
            Ok(())
        }
    }
}

pub(crate) fn render_principals(principals: &[Principal], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&principals_json(principals)),
        OutputFormat::Table => {
            print!("{}", principals_table(principals));
            Ok(())
        }
    }
}

fn print_json(value: &Value) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn plan_table(plan: &RetentionPlan) -> String {
    let mut out = format!("total: {}b\n", plan.total_bytes);
    let _ = writeln!(
        out,
        "{:<36} {:>6} {:>14} {:>8} {:>8} READONLY",
        "POLICY", "DAYS", "MAX_SIZE", "MAX_AGE", "DELETE"
    );
    for entry in &plan.entries {
        let detail = &entry.detail;
        let _ = writeln!(
            out,
            "{:<36} {:>6} {:>14} {:>8} {:>8} {}",
            entry.policy_name(),
            entry.retention_days,
            detail.rollover_max_size,
            detail.rollover_max_age,
            detail.delete_min_age,
            detail.read_only_after_rollover
        );
    }
    out
}

pub(crate) fn plan_json(plan: &RetentionPlan) -> Value {
    let entries: Vec<Value> = plan
        .entries
        .iter()
        .map(|entry| {
            json!({
                "category": entry.category.slug(),
                "policy": entry.policy_name(),
                "retention_days": entry.retention_days,
                "rollover_max_size": entry.detail.rollover_max_size,
                "rollover_max_age": entry.detail.rollover_max_age,
                "delete_min_age": entry.detail.delete_min_age,
                "read_only_after_rollover": entry.detail.read_only_after_rollover,
            })
        })
        .collect();
    json!({ "total_bytes": plan.total_bytes, "policies": entries })
}

const fn outcome_label(outcome: &PolicyOutcome) -> &'static str {
    match outcome {
        PolicyOutcome::Created => "created",
        PolicyOutcome::Updated { .. } => "updated",
        PolicyOutcome::Unchanged => "unchanged",
    }
}

fn changed_fields(outcome: &PolicyOutcome) -> &[&'static str] {
    match outcome {
        PolicyOutcome::Updated { changed } => changed,
        PolicyOutcome::Created | PolicyOutcome::Unchanged => &[],
    }
}

pub(crate) fn outcomes_table(outcomes: &[CategoryOutcome]) -> String {
    let mut out = format!("{:<36} {:<10} CHANGED\n", "POLICY", "OUTCOME");
    for item in outcomes {
        let changed = changed_fields(&item.outcome);
        let _ = writeln!(
            out,
            "{:<36} {:<10} {}",
            item.category.policy_name(),
            outcome_label(&item.outcome),
            if changed.is_empty() {
                "-".to_string()
            } else {
                changed.join(",")
            }
        );
    }
    out
}

pub(crate) fn outcomes_json(outcomes: &[CategoryOutcome]) -> Value {
    Value::Array(
        outcomes
            .iter()
            .map(|item| {
                json!({
                    "policy": item.category.policy_name(),
                    "outcome": outcome_label(&item.outcome),
                    "changed": changed_fields(&item.outcome),
                })
            })
            .collect(),
    )
}

pub(crate) fn principals_table(principals: &[Principal]) -> String {
    let mut out = format!("{:<48} ROLES\n", "USERNAME");
    for principal in principals {
        let _ = writeln!(
            out,
            "{:<48} {}",
            principal.username,
            principal.role_names().join(",")
        );
    }
    out
}

pub(crate) fn principals_json(principals: &[Principal]) -> Value {
    Value::Array(
        principals
            .iter()
            .map(|principal| {
                json!({
                    "username": principal.username,
                    "roles": principal.role_names(),
                })
            })
            .collect(),
    )
}
