//! Per-category retention plan evaluated from storage settings.

use loghold_core::LifecyclePolicy;

use crate::budget::PolicyDetail;
use crate::category::LogCategory;
use crate::document::synthesize;
use crate::settings::StorageSettings;

/// Desired policy for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPolicy {
    /// Category the policy governs.
    pub category: LogCategory,
    /// Effective retention in days.
    pub retention_days: i64,
    /// Computed thresholds.
    pub detail: PolicyDetail,
}

impl PlannedPolicy {
    /// Name of the policy in the store.
    #[must_use]
    pub fn policy_name(&self) -> String {
        self.category.policy_name()
    }

    /// Synthesized lifecycle document.
    #[must_use]
    pub fn document(&self) -> LifecyclePolicy {
        synthesize(&self.detail)
    }
}

/// Desired policies for every category, in [`LogCategory::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPlan {
    /// Budget the plan was computed from.
    pub total_bytes: u64,
    /// One entry per category.
    pub entries: Vec<PlannedPolicy>,
}

impl RetentionPlan {
    /// Evaluate the category catalogue against `settings`.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        let total_bytes = settings.total_bytes();
        let entries = LogCategory::ALL
            .into_iter()
            .map(|category| {
                let retention_days = settings.retention.days_for(category);
                PlannedPolicy {
                    category,
                    retention_days,
                    detail: PolicyDetail::plan(total_bytes, category, retention_days),
                }
            })
            .collect();
        Self {
            total_bytes,
            entries,
        }
    }

    /// Entry for a single category.
    #[must_use]
    pub fn entry(&self, category: LogCategory) -> Option<&PlannedPolicy> {
        self.entries.iter().find(|entry| entry.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{GIB, MAX_ROLLOVER_BYTES, format_bytes};
    use crate::settings::RetentionSettings;

    #[test]
    fn plan_covers_every_category_in_order() {
        let plan = RetentionPlan::from_settings(&StorageSettings::default());
        let categories: Vec<_> = plan.entries.iter().map(|entry| entry.category).collect();
        assert_eq!(categories, LogCategory::ALL.to_vec());
        assert_eq!(plan.total_bytes, 10 * GIB);
    }

    #[test]
    fn plan_applies_retention_and_cap() {
        let settings = StorageSettings {
            storage_bytes: Some(2048 * GIB),
            retention: RetentionSettings {
                flows: Some(30),
                dns_logs: Some(0),
                ..RetentionSettings::default()
            },
        };
        let plan = RetentionPlan::from_settings(&settings);

        let flows = plan.entry(LogCategory::Flows).map(|entry| &entry.detail);
        assert_eq!(
            flows.map(|detail| detail.rollover_max_size.as_str()),
            Some(format_bytes(MAX_ROLLOVER_BYTES).as_str())
        );
        assert_eq!(flows.map(|detail| detail.rollover_max_age.as_str()), Some("7d"));

        let dns = plan.entry(LogCategory::Dns).map(|entry| &entry.detail);
        assert_eq!(dns.map(|detail| detail.rollover_max_age.as_str()), Some("1h"));
        assert_eq!(dns.map(|detail| detail.delete_min_age.as_str()), Some("0d"));
    }

    #[test]
    fn planned_policy_names_follow_category() {
        let plan = RetentionPlan::from_settings(&StorageSettings::default());
        let events = plan.entry(LogCategory::Events);
        assert_eq!(
            events.map(PlannedPolicy::policy_name).as_deref(),
            Some("tigera_secure_ee_events_policy")
        );
        assert!(
            events
                .map(PlannedPolicy::document)
                .is_some_and(|doc| doc.phases.warm.actions.readonly.is_none())
        );
    }
}
