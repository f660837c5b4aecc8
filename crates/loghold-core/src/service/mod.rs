//! Store traits implemented by remote adapters (e.g. the Elasticsearch client).

use async_trait::async_trait;

use crate::error::RemoteResult;
use crate::model::{LifecyclePolicy, PrincipalBody, PrincipalRecord, RoleDefinition};

/// Lifecycle policy endpoints of a log store.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Fetch a policy by name; a missing policy yields [`crate::RemoteError::NotFound`].
    async fn get_policy(&self, name: &str) -> RemoteResult<LifecyclePolicy>;

    /// Create or fully replace the named policy.
    async fn put_policy(&self, name: &str, policy: &LifecyclePolicy) -> RemoteResult<()>;
}

/// Security endpoints of a log store.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// Create or replace the named role.
    async fn put_role(&self, name: &str, definition: &RoleDefinition) -> RemoteResult<()>;

    /// Delete the named role.
    async fn delete_role(&self, name: &str) -> RemoteResult<()>;

    /// Create or replace the named principal.
    async fn put_principal(&self, username: &str, body: &PrincipalBody) -> RemoteResult<()>;

    /// Delete the named principal.
    async fn delete_principal(&self, username: &str) -> RemoteResult<()>;

    /// List every principal with its role names.
    async fn list_principals(&self) -> RemoteResult<Vec<PrincipalRecord>>;
}
