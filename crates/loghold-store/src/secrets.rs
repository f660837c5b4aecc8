//! Secret sources feeding the connection bootstrap.
//!
//! # Design
//! - A missing secret is `Ok(None)`, which the bootstrapper reports as
//!   "waiting"; only read failures are errors.
//! - The directory source follows the volume-mount layout
//!   `{root}/{secret}/{key}` and skips dot-prefixed entries.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{BootstrapError, BootstrapResult};

/// Secret holding the administrator credentials as a single key/value pair.
pub const ADMIN_CREDENTIALS_SECRET: &str = "log-store-admin-user";
/// Secret holding the CA of the in-cluster store.
pub const INTERNAL_CA_SECRET: &str = "log-store-internal-ca";
/// Secret holding the CA of an external store.
pub const EXTERNAL_CA_SECRET: &str = "log-store-external-ca";
/// Secret holding the mTLS client certificate for an external store.
pub const CLIENT_CERT_SECRET: &str = "log-store-client-certs";

/// Key of the PEM CA certificate in a CA secret.
pub const CA_CERT_KEY: &str = "tls.crt";
/// Key of the PEM client certificate in the mTLS secret.
pub const CLIENT_CERT_KEY: &str = "client.crt";
/// Key of the PEM client private key in the mTLS secret.
pub const CLIENT_KEY_KEY: &str = "client.key";

/// Named set of key/value entries.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret {
    name: String,
    data: BTreeMap<String, Vec<u8>>,
}

impl Secret {
    /// Secret with the given entries.
    #[must_use]
    pub fn new(name: impl Into<String>, data: BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Secret name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.data.get(key).map(Vec::as_slice)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the secret has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.data
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_slice()))
    }
}

impl Debug for Secret {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Secret")
            .field("name", &self.name)
            .field("keys", &self.data.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Source of named secrets.
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Fetch a secret; `Ok(None)` when it does not exist yet.
    async fn secret(&self, name: &str) -> BootstrapResult<Option<Secret>>;
}

/// Secrets mounted as one directory per secret and one file per key.
#[derive(Debug, Clone)]
pub struct DirectorySecretSource {
    root: PathBuf,
}

impl DirectorySecretSource {
    /// Source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl SecretSource for DirectorySecretSource {
    async fn secret(&self, name: &str) -> BootstrapResult<Option<Secret>> {
        let dir = self.root.join(name);
        let read_error = |path: &Path, source: io::Error| BootstrapError::SecretRead {
            secret: name.to_string(),
            path: path.to_path_buf(),
            source,
        };

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(read_error(&dir, err)),
        };

        let mut data = BTreeMap::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| read_error(&dir, err))?
        {
            let key = entry.file_name().to_string_lossy().into_owned();
            if key.starts_with('.') {
                continue;
            }
            let path = entry.path();
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|err| read_error(&path, err))?;
            if !metadata.is_file() {
                continue;
            }
            let value = tokio::fs::read(&path)
                .await
                .map_err(|err| read_error(&path, err))?;
            data.insert(key, value);
        }

        Ok(Some(Secret::new(name, data)))
    }
}

/// Secrets held in memory, for embedding callers that resolve secrets themselves.
#[derive(Debug, Clone, Default)]
pub struct MemorySecretSource {
    secrets: BTreeMap<String, Secret>,
}

impl MemorySecretSource {
    /// Empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Source with `secret` added under its name.
    #[must_use]
    pub fn with_secret(mut self, secret: Secret) -> Self {
        self.secrets.insert(secret.name().to_string(), secret);
        self
    }
}

#[async_trait]
impl SecretSource for MemorySecretSource {
    async fn secret(&self, name: &str) -> BootstrapResult<Option<Secret>> {
        Ok(self.secrets.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;

    #[tokio::test]
    async fn directory_source_reads_mounted_keys() -> Result<()> {
        let root = tempfile::tempdir()?;
        let dir = root.path().join(ADMIN_CREDENTIALS_SECRET);
        fs::create_dir_all(dir.join("..2024_01_01"))?;
        fs::write(dir.join("elastic"), b"changeme")?;
        fs::write(dir.join("..data"), b"ignored")?;

        let source = DirectorySecretSource::new(root.path());
        let secret = source
            .secret(ADMIN_CREDENTIALS_SECRET)
            .await?
            .ok_or_else(|| anyhow::anyhow!("secret missing"))?;

        assert_eq!(secret.name(), ADMIN_CREDENTIALS_SECRET);
        assert_eq!(secret.len(), 1);
        assert_eq!(secret.get("elastic"), Some(&b"changeme"[..]));
        Ok(())
    }

    #[tokio::test]
    async fn missing_directory_is_absent_not_error() -> Result<()> {
        let root = tempfile::tempdir()?;
        let source = DirectorySecretSource::new(root.path());
        assert!(source.secret(INTERNAL_CA_SECRET).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn memory_source_returns_registered_secrets() -> Result<()> {
        let source = MemorySecretSource::new().with_secret(Secret::new(
            CLIENT_CERT_SECRET,
            BTreeMap::from([(CLIENT_CERT_KEY.to_string(), b"pem".to_vec())]),
        ));
        assert!(source.secret(CLIENT_CERT_SECRET).await?.is_some());
        assert!(source.secret(EXTERNAL_CA_SECRET).await?.is_none());
        Ok(())
    }

    #[test]
    fn debug_output_hides_values() {
        let secret = Secret::new(
            "creds",
            BTreeMap::from([("elastic".to_string(), b"hunter2".to_vec())]),
        );
        let rendered = format!("{secret:?}");
        assert!(rendered.contains("elastic"));
        assert!(!rendered.contains("hunter2"));
    }
}
