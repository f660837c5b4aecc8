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

//! Authenticated connection to an Elasticsearch-compatible log store.
//!
//! Layout: `secrets.rs` (secret sources), `credentials.rs` (credential and TLS
//! material), `retry.rs` (bounded construction retry), `bootstrap.rs`
//! (`Bootstrapper`), `client.rs` (`ElasticClient`, implementing the
//! [`loghold_core`] store traits).

pub mod bootstrap;
pub mod client;
pub mod credentials;
pub mod error;
pub mod retry;
pub mod secrets;

pub use bootstrap::{Bootstrapper, ConnectionMaterial, ConnectionSettings};
pub use client::ElasticClient;
pub use credentials::{Credentials, TlsMaterial};
pub use error::{BootstrapError, BootstrapResult};
pub use retry::{RetryExhausted, RetryPolicy, Sleeper, TokioSleeper, retry_construct};
pub use secrets::{DirectorySecretSource, MemorySecretSource, Secret, SecretSource};
