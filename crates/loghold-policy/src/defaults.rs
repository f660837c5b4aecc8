//! Default retention windows applied when settings leave a value unset.
//!
//! # Design
//! - Keep every default in one place so the catalogue and docs stay aligned.
//! - Categories without a setting use a fixed window that cannot be overridden.

/// Flow, DNS and BGP log retention in days.
pub(crate) const LOG_RETENTION_DAYS: i64 = 8;
/// Audit, snapshot and compliance report retention in days.
pub(crate) const REPORT_RETENTION_DAYS: i64 = 91;
/// Fixed L7 log retention in days.
pub(crate) const L7_RETENTION_DAYS: i64 = 1;
/// Fixed benchmark result and event retention in days.
pub(crate) const FIXED_RETENTION_DAYS: i64 = 91;
