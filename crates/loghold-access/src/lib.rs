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

//! Principal and role provisioning for the log store.
//!
//! Layout: `model.rs` (principals and roles), `naming.rs` (deterministic names
//! and the well-known principals), `sync.rs` (`PrincipalSynchronizer`).

pub mod error;
pub mod model;
pub mod naming;
pub mod sync;

pub use error::{AccessError, AccessResult};
pub use model::{Principal, Role};
pub use naming::{
    DASHBOARD_INSTALLER_USER, LINSEED_USER, dashboard_installer_principal, format_name,
    index_pattern, linseed_principal,
};
pub use sync::PrincipalSynchronizer;
