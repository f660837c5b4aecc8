//! Principal and role synchronisation against a [`PrincipalStore`].
//!
//! # Design
//! - Roles are written before the principal that references them, and deleted
//!   before the principal is deleted.
//! - Fail fast: the first error is returned and nothing already written is
//!   rolled back.

use loghold_core::{PrincipalBody, PrincipalStore, RoleDefinition};
use tracing::{error, info};

use crate::error::{AccessError, AccessResult};
use crate::model::{Principal, Role};

/// Creates, deletes and lists principals through a [`PrincipalStore`].
pub struct PrincipalSynchronizer<'a, S: PrincipalStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: PrincipalStore + ?Sized> PrincipalSynchronizer<'a, S> {
    /// Synchronizer writing through `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Upsert every defined role of `principal`, then the principal itself.
    ///
    /// # Errors
    ///
    /// Returns the first role or principal write that fails.
    pub async fn create_principal(&self, principal: &Principal) -> AccessResult<()> {
        for role in &principal.roles {
            if let Some(definition) = &role.definition {
                self.put_role(&role.name, definition).await?;
            }
        }

        let body = PrincipalBody {
            password: principal.password.clone(),
            roles: principal.role_names(),
        };
        self.store
            .put_principal(&principal.username, &body)
            .await
            .map_err(|err| {
                error!(principal = %principal.username, error = %err, "failed to create principal");
                AccessError::remote("user.put", &principal.username, err)
            })?;
        info!(principal = %principal.username, roles = body.roles.len(), "principal provisioned");
        Ok(())
    }

    /// Delete every role attached to `principal`, then the principal itself.
    ///
    /// # Errors
    ///
    /// Returns the first role or principal delete that fails.
    pub async fn delete_principal(&self, principal: &Principal) -> AccessResult<()> {
        for role in &principal.roles {
            self.delete_role(role).await?;
        }

        self.store
            .delete_principal(&principal.username)
            .await
            .map_err(|err| {
                error!(principal = %principal.username, error = %err, "failed to delete principal");
                AccessError::remote("user.delete", &principal.username, err)
            })?;
        info!(principal = %principal.username, "principal retracted");
        Ok(())
    }

    /// Every principal in the store with role names only.
    ///
    /// # Errors
    ///
    /// Returns an error when the listing request fails.
    pub async fn list_principals(&self) -> AccessResult<Vec<Principal>> {
        let records = self.store.list_principals().await.map_err(|err| {
            error!(error = %err, "failed to list principals");
            AccessError::remote("user.list", "*", err)
        })?;
        Ok(records
            .into_iter()
            .map(|record| Principal {
                username: record.username,
                password: String::new(),
                roles: record.roles.into_iter().map(Role::named).collect(),
            })
            .collect())
    }

    async fn put_role(&self, name: &str, definition: &RoleDefinition) -> AccessResult<()> {
        if name.is_empty() {
            return Err(AccessError::InvalidRole {
                reason: "empty_name",
            });
        }
        self.store
            .put_role(name, definition)
            .await
            .map_err(|err| AccessError::remote("role.put", name, err))
    }

    async fn delete_role(&self, role: &Role) -> AccessResult<()> {
        if role.name.is_empty() {
            return Err(AccessError::InvalidRole {
                reason: "empty_name",
            });
        }
        self.store
            .delete_role(&role.name)
            .await
            .map_err(|err| AccessError::remote("role.delete", &role.name, err))
    }
}
