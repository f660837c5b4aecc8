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

//! Store-agnostic wire models and traits shared by the Loghold crates.
//!
//! Layout: `model/` (lifecycle policy and security documents), `service/`
//! (`PolicyStore` and `PrincipalStore` seams), `error.rs` (`RemoteError`).

pub mod error;
pub mod model;
pub mod service;

pub use error::{RemoteError, RemoteResult};
pub use model::{
    ApplicationPrivilege, DeleteActions, DeletePhase, EmptyAction, HotActions, HotPhase,
    LifecyclePolicy, PolicyPhases, PrincipalBody, PrincipalRecord, RoleDefinition, RoleIndex,
    Rollover, SetPriority, WarmActions, WarmPhase,
};
pub use service::{PolicyStore, PrincipalStore};
