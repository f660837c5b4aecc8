//! Role and principal documents of the security API.

use std::fmt::{self, Debug, Formatter};

use serde::{Deserialize, Serialize};

/// Named bundle of privileges attachable to a principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Cluster-level privileges.
    #[serde(default)]
    pub cluster: Vec<String>,
    /// Index-level grants.
    #[serde(default)]
    pub indices: Vec<RoleIndex>,
    /// Application-level grants.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applications: Vec<ApplicationPrivilege>,
}

/// Privileges granted on a set of index name patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleIndex {
    /// Index name patterns.
    pub names: Vec<String>,
    /// Privileges granted on matching indices.
    pub privileges: Vec<String>,
}

/// Privileges granted on an application's resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPrivilege {
    /// Application name.
    pub application: String,
    /// Granted privileges.
    pub privileges: Vec<String>,
    /// Resources the privileges apply to.
    pub resources: Vec<String>,
}

/// Body of a principal upsert.
///
/// `roles` is always encoded as a list; the store rejects `null`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct PrincipalBody {
    /// Principal password.
    pub password: String,
    /// Names of the roles granted to the principal.
    pub roles: Vec<String>,
}

impl Debug for PrincipalBody {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PrincipalBody")
            .field("password", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

/// Principal as reported by the store's listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrincipalRecord {
    /// Principal name.
    pub username: String,
    /// Names of the roles granted to the principal.
    pub roles: Vec<String>,
}
