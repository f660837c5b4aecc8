#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Retention planning and lifecycle policy reconciliation.
//!
//! Layout: `category.rs` (log categories and their budget shares), `settings.rs`
//! (storage/retention input), `budget.rs` (rollover and deletion thresholds),
//! `document.rs` (policy synthesis and comparison), `plan.rs` (per-category
//! plan), `reconcile.rs` (diff-and-apply against a [`loghold_core::PolicyStore`]).

pub mod budget;
pub mod category;
mod defaults;
pub mod document;
pub mod error;
pub mod plan;
pub mod reconcile;
pub mod settings;

pub use budget::{
    BudgetParams, GIB, MAX_ROLLOVER_BYTES, PolicyDetail, RETENTION_FACTOR, delete_age,
    format_bytes, rollover_age, rollover_size,
};
pub use category::{BudgetTier, LogCategory};
pub use document::{PolicyFingerprint, synthesize};
pub use error::{PolicyError, PolicyResult};
pub use plan::{PlannedPolicy, RetentionPlan};
pub use reconcile::{CategoryOutcome, PolicyOutcome, PolicyReconciler};
pub use settings::{DEFAULT_STORAGE_BYTES, RetentionSettings, StorageSettings};
