//! Storage and retention input supplied by the deployment.

use serde::{Deserialize, Serialize};

use crate::budget::GIB;
use crate::category::LogCategory;
use crate::defaults::{
    FIXED_RETENTION_DAYS, L7_RETENTION_DAYS, LOG_RETENTION_DAYS, REPORT_RETENTION_DAYS,
};

/// Storage budget used when no storage request is configured.
pub const DEFAULT_STORAGE_BYTES: u64 = 10 * GIB;

/// Storage request and retention windows for the log store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Total bytes requested for the store.
    pub storage_bytes: Option<u64>,
    /// Per-category retention windows.
    pub retention: RetentionSettings,
}

impl StorageSettings {
    /// Total allocatable bytes, falling back to [`DEFAULT_STORAGE_BYTES`].
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.storage_bytes.unwrap_or(DEFAULT_STORAGE_BYTES)
    }
}

/// Retention windows in days; `None` selects the default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSettings {
    /// Flow log retention.
    pub flows: Option<i64>,
    /// DNS log retention.
    pub dns_logs: Option<i64>,
    /// BGP log retention.
    pub bgp_logs: Option<i64>,
    /// Audit log retention (enterprise and Kubernetes).
    pub audit_reports: Option<i64>,
    /// Snapshot retention.
    pub snapshots: Option<i64>,
    /// Compliance report retention.
    pub compliance_reports: Option<i64>,
}

impl RetentionSettings {
    /// Effective retention for a category.
    ///
    /// An explicit `0` is kept as-is; only an unset value takes the default.
    #[must_use]
    pub fn days_for(&self, category: LogCategory) -> i64 {
        match category {
            LogCategory::Flows => self.flows.unwrap_or(LOG_RETENTION_DAYS),
            LogCategory::Dns => self.dns_logs.unwrap_or(LOG_RETENTION_DAYS),
            LogCategory::Bgp => self.bgp_logs.unwrap_or(LOG_RETENTION_DAYS),
            LogCategory::L7 => L7_RETENTION_DAYS,
            LogCategory::AuditEe | LogCategory::AuditKube => {
                self.audit_reports.unwrap_or(REPORT_RETENTION_DAYS)
            }
            LogCategory::Snapshots => self.snapshots.unwrap_or(REPORT_RETENTION_DAYS),
            LogCategory::ComplianceReports => {
                self.compliance_reports.unwrap_or(REPORT_RETENTION_DAYS)
            }
            LogCategory::BenchmarkResults | LogCategory::Events => FIXED_RETENTION_DAYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn unset_values_use_defaults() {
        let settings = StorageSettings::default();
        assert_eq!(settings.total_bytes(), 10 * GIB);
        assert_eq!(settings.retention.days_for(LogCategory::Flows), 8);
        assert_eq!(settings.retention.days_for(LogCategory::AuditKube), 91);
        assert_eq!(settings.retention.days_for(LogCategory::L7), 1);
        assert_eq!(settings.retention.days_for(LogCategory::Events), 91);
    }

    #[test]
    fn explicit_zero_is_preserved() {
        let retention = RetentionSettings {
            dns_logs: Some(0),
            ..RetentionSettings::default()
        };
        assert_eq!(retention.days_for(LogCategory::Dns), 0);
    }

    #[test]
    fn decodes_partial_settings_file() -> Result<()> {
        let settings: StorageSettings = serde_json::from_value(json!({
            "storage_bytes": 1_099_511_627_776_u64,
            "retention": { "flows": 14, "snapshots": 30 }
        }))?;
        assert_eq!(settings.total_bytes(), 1_099_511_627_776);
        assert_eq!(settings.retention.days_for(LogCategory::Flows), 14);
        assert_eq!(settings.retention.days_for(LogCategory::Snapshots), 30);
        assert_eq!(settings.retention.days_for(LogCategory::Bgp), 8);
        Ok(())
    }

    #[test]
    fn fixed_categories_ignore_settings() {
        let retention = RetentionSettings {
            flows: Some(2),
            dns_logs: Some(2),
            bgp_logs: Some(2),
            audit_reports: Some(2),
            snapshots: Some(2),
            compliance_reports: Some(2),
        };
        assert_eq!(retention.days_for(LogCategory::L7), 1);
        assert_eq!(retention.days_for(LogCategory::BenchmarkResults), 91);
    }
}
