//! Diff-and-apply reconciliation of lifecycle policies.
//!
//! # Design
//! - Fetch, compare four fields, and write the full document on any difference.
//! - A missing policy is created; an identical one is left untouched.
//! - Categories are processed in plan order. The first failure stops the pass
//!   and is returned; earlier writes stay in place and the caller re-runs later.

use loghold_core::PolicyStore;
use tracing::{debug, error, info};

use crate::budget::PolicyDetail;
use crate::category::LogCategory;
use crate::document::{PolicyFingerprint, synthesize};
use crate::error::{PolicyError, PolicyResult};
use crate::plan::RetentionPlan;

/// What a reconciliation did to a single policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyOutcome {
    /// The policy did not exist and was created.
    Created,
    /// The policy differed and was replaced.
    Updated {
        /// Fields that differed from the stored policy.
        changed: Vec<&'static str>,
    },
    /// The stored policy already matched.
    Unchanged,
}

impl PolicyOutcome {
    /// Whether the outcome involved a remote write.
    #[must_use]
    pub const fn wrote(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Outcome for one category of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOutcome {
    /// Category that was reconciled.
    pub category: LogCategory,
    /// Result of the reconciliation.
    pub outcome: PolicyOutcome,
}

/// Reconciles desired lifecycle policies against a [`PolicyStore`].
pub struct PolicyReconciler<'a, S: PolicyStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: PolicyStore + ?Sized> PolicyReconciler<'a, S> {
    /// Reconciler writing through `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Reconcile every entry of `plan`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first remote failure other than a missing policy.
    pub async fn reconcile(&self, plan: &RetentionPlan) -> PolicyResult<Vec<CategoryOutcome>> {
        let mut outcomes = Vec::with_capacity(plan.entries.len());
        for entry in &plan.entries {
            let outcome = self
                .reconcile_policy(&entry.policy_name(), &entry.detail)
                .await?;
            outcomes.push(CategoryOutcome {
                category: entry.category,
                outcome,
            });
        }
        Ok(outcomes)
    }

    /// Bring the named policy in line with `detail`.
    ///
    /// # Errors
    ///
    /// Returns an error when fetching or writing the policy fails for any
    /// reason other than the policy being absent.
    pub async fn reconcile_policy(
        &self,
        name: &str,
        detail: &PolicyDetail,
    ) -> PolicyResult<PolicyOutcome> {
        let desired = PolicyFingerprint::from_detail(detail);

        let outcome = match self.store.get_policy(name).await {
            Ok(stored) => {
                let changed = PolicyFingerprint::from_document(&stored).changed_fields(&desired);
                if changed.is_empty() {
                    debug!(policy = name, "lifecycle policy up to date");
                    return Ok(PolicyOutcome::Unchanged);
                }
                PolicyOutcome::Updated { changed }
            }
            Err(err) if err.is_not_found() => PolicyOutcome::Created,
            Err(err) => {
                error!(policy = name, error = %err, "failed to fetch lifecycle policy");
                return Err(PolicyError::remote("ilm.get", name, err));
            }
        };

        self.store
            .put_policy(name, &synthesize(detail))
            .await
            .map_err(|err| {
                error!(policy = name, error = %err, "failed to apply lifecycle policy");
                PolicyError::remote("ilm.put", name, err)
            })?;

        match &outcome {
            PolicyOutcome::Updated { changed } => {
                info!(policy = name, changed = ?changed, "lifecycle policy replaced");
            }
            _ => info!(policy = name, "lifecycle policy created"),
        }
        Ok(outcome)
    }
}
