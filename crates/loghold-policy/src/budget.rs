//! Rollover and deletion thresholds derived from the storage budget.
//!
//! # Design
//! - Pure functions; no I/O and no shared state.
//! - An index rolls over several times (the retention factor) inside its delete
//!   window so older segments turn read-only before they are removed.
//! - Rollover size is capped at a shard-safe size regardless of budget.

use crate::category::LogCategory;

/// One gibibyte in bytes.
pub const GIB: u64 = 1024 * 1024 * 1024;
/// Number of rollovers expected within a retention window.
pub const RETENTION_FACTOR: i64 = 4;
/// Upper bound for a single index before rollover.
pub const MAX_ROLLOVER_BYTES: u64 = 30 * GIB;

/// Tunables for [`rollover_size`] and [`rollover_age`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetParams {
    /// Rollovers per retention window; values below 1 are treated as 1.
    pub retention_factor: i64,
    /// Maximum rollover size in bytes.
    pub cap_bytes: u64,
}

impl Default for BudgetParams {
    fn default() -> Self {
        Self {
            retention_factor: RETENTION_FACTOR,
            cap_bytes: MAX_ROLLOVER_BYTES,
        }
    }
}

impl BudgetParams {
    const fn factor(self) -> i64 {
        if self.retention_factor < 1 {
            1
        } else {
            self.retention_factor
        }
    }
}

/// Bytes an index may reach before rolling over:
/// `min(total * tier_share * category_share / factor, cap)`, truncated.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn rollover_size(
    total_bytes: u64,
    tier_share: f64,
    category_share: f64,
    params: BudgetParams,
) -> u64 {
    let share = total_bytes as f64 * tier_share * category_share / params.factor() as f64;
    // `as` saturates: NaN and negatives land on 0, overflow on u64::MAX.
    (share as u64).min(params.cap_bytes)
}

/// Maximum index age before rollover.
///
/// Retention of zero or less rolls over hourly instead of continuously;
/// retention shorter than the factor rolls over daily; otherwise the window is
/// divided by the factor, dropping any remainder.
#[must_use]
pub fn rollover_age(retention_days: i64, retention_factor: i64) -> String {
    let factor = BudgetParams {
        retention_factor,
        cap_bytes: MAX_ROLLOVER_BYTES,
    }
    .factor();
    if retention_days <= 0 {
        "1h".to_string()
    } else if retention_days < factor {
        "1d".to_string()
    } else {
        format!("{}d", retention_days / factor)
    }
}

/// Age after which an index is deleted; the retention value is used verbatim,
/// so `0` yields `"0d"`.
#[must_use]
pub fn delete_age(retention_days: i64) -> String {
    format!("{retention_days}d")
}

/// Byte count in the store's size notation.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    format!("{bytes}b")
}

/// Computed thresholds for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDetail {
    /// Rollover size, e.g. `"2254857830b"`.
    pub rollover_max_size: String,
    /// Rollover age, e.g. `"2d"`.
    pub rollover_max_age: String,
    /// Delete-phase age, e.g. `"8d"`.
    pub delete_min_age: String,
    /// Whether the warm phase makes indices read-only.
    pub read_only_after_rollover: bool,
}

impl PolicyDetail {
    /// Thresholds for `category` under `total_bytes` and `retention_days`.
    #[must_use]
    pub fn plan(total_bytes: u64, category: LogCategory, retention_days: i64) -> Self {
        Self::plan_with(
            total_bytes,
            category,
            retention_days,
            BudgetParams::default(),
        )
    }

    /// Same as [`PolicyDetail::plan`] with explicit tunables.
    #[must_use]
    pub fn plan_with(
        total_bytes: u64,
        category: LogCategory,
        retention_days: i64,
        params: BudgetParams,
    ) -> Self {
        let size = rollover_size(
            total_bytes,
            category.tier().share(),
            category.tier_fraction(),
            params,
        );
        Self {
            rollover_max_size: format_bytes(size),
            rollover_max_age: rollover_age(retention_days, params.retention_factor),
            delete_min_age: delete_age(retention_days),
            read_only_after_rollover: category.read_only_after_rollover(),
        }
    }
}
