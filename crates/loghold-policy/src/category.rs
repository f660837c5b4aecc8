//! Log categories and their fixed share of the storage budget.
//!
//! # Design
//! - Major categories (flows, dns, bgp, l7) share 70% of the total, split 85/5/5/5.
//! - Minor categories share 10% of the total evenly.
//! - Shares are constants; they do not depend on which categories are enabled,
//!   so the remaining 20% stays as headroom.

use std::fmt::{self, Display, Formatter};

/// Prefix shared by every managed time-series index.
pub const INDEX_PREFIX: &str = "tigera_secure_ee";

/// Number of minor categories splitting the minor tier.
const MINOR_CATEGORY_COUNT: f64 = 6.0;

/// Budget tier a category draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTier {
    /// High-volume logs.
    Major,
    /// Low-volume reports and events.
    Minor,
}

impl BudgetTier {
    /// Fraction of the total storage budget assigned to the tier.
    #[must_use]
    pub const fn share(self) -> f64 {
        match self {
            Self::Major => 0.7,
            Self::Minor => 0.1,
        }
    }
}

/// Time-series log categories with a managed lifecycle policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogCategory {
    /// Flow logs.
    Flows,
    /// DNS logs.
    Dns,
    /// BGP logs.
    Bgp,
    /// L7 logs.
    L7,
    /// Enterprise audit logs.
    AuditEe,
    /// Kubernetes audit logs.
    AuditKube,
    /// Configuration snapshots.
    Snapshots,
    /// Compliance reports.
    ComplianceReports,
    /// Benchmark results.
    BenchmarkResults,
    /// Security events.
    Events,
}

impl LogCategory {
    /// Every category in reconciliation order.
    pub const ALL: [Self; 10] = [
        Self::Flows,
        Self::Dns,
        Self::Bgp,
        Self::L7,
        Self::AuditEe,
        Self::AuditKube,
        Self::Snapshots,
        Self::ComplianceReports,
        Self::BenchmarkResults,
        Self::Events,
    ];

    /// Index-name fragment for the category.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Flows => "flows",
            Self::Dns => "dns",
            Self::Bgp => "bgp",
            Self::L7 => "l7",
            Self::AuditEe => "audit_ee",
            Self::AuditKube => "audit_kube",
            Self::Snapshots => "snapshots",
            Self::ComplianceReports => "compliance_reports",
            Self::BenchmarkResults => "benchmark_results",
            Self::Events => "events",
        }
    }

    /// Base index name, e.g. `tigera_secure_ee_flows`.
    #[must_use]
    pub fn index_name(self) -> String {
        format!("{INDEX_PREFIX}_{}", self.slug())
    }

    /// Lifecycle policy name, e.g. `tigera_secure_ee_flows_policy`.
    #[must_use]
    pub fn policy_name(self) -> String {
        format!("{}_policy", self.index_name())
    }

    /// Budget tier the category draws from.
    #[must_use]
    pub const fn tier(self) -> BudgetTier {
        match self {
            Self::Flows | Self::Dns | Self::Bgp | Self::L7 => BudgetTier::Major,
            Self::AuditEe
            | Self::AuditKube
            | Self::Snapshots
            | Self::ComplianceReports
            | Self::BenchmarkResults
            | Self::Events => BudgetTier::Minor,
        }
    }

    /// Fraction of the tier assigned to this category.
    #[must_use]
    pub fn tier_fraction(self) -> f64 {
        match self {
            Self::Flows => 0.85,
            Self::Dns | Self::Bgp | Self::L7 => 0.05,
            _ => 1.0 / MINOR_CATEGORY_COUNT,
        }
    }

    /// Whether rolled-over indices are made read-only before deletion.
    #[must_use]
    pub const fn read_only_after_rollover(self) -> bool {
        !matches!(self, Self::Events)
    }
}

impl Display for LogCategory {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_index_prefix() {
        assert_eq!(LogCategory::Flows.index_name(), "tigera_secure_ee_flows");
        assert_eq!(
            LogCategory::ComplianceReports.policy_name(),
            "tigera_secure_ee_compliance_reports_policy"
        );
    }

    #[test]
    fn tier_fractions_sum_to_one() {
        for tier in [BudgetTier::Major, BudgetTier::Minor] {
            let sum: f64 = LogCategory::ALL
                .iter()
                .filter(|category| category.tier() == tier)
                .map(|category| category.tier_fraction())
                .sum();
            assert!((sum - 1.0).abs() < 1e-9, "{tier:?} fractions sum to {sum}");
        }
    }

    #[test]
    fn shares_leave_headroom() {
        let allocated: f64 = LogCategory::ALL
            .iter()
            .map(|category| category.tier().share() * category.tier_fraction())
            .sum();
        assert!((allocated - 0.8).abs() < 1e-9);
    }

    #[test]
    fn only_events_stay_writable() {
        let writable: Vec<_> = LogCategory::ALL
            .into_iter()
            .filter(|category| !category.read_only_after_rollover())
            .collect();
        assert_eq!(writable, vec![LogCategory::Events]);
    }
}
