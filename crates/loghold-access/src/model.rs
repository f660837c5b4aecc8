//! Principals and the roles attached to them.

use std::fmt::{self, Debug, Formatter};

use loghold_core::RoleDefinition;

/// Role attached to a principal.
///
/// Roles read back from the store carry no definition; only roles with a
/// definition are upserted when a principal is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Role name.
    pub name: String,
    /// Privileges granted by the role, when known.
    pub definition: Option<RoleDefinition>,
}

impl Role {
    /// Role reference without a definition.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: None,
        }
    }
}

/// Authenticated identity in the store.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    /// Principal name.
    pub username: String,
    /// Password; empty for principals read back from the store.
    pub password: String,
    /// Roles in grant order.
    pub roles: Vec<Role>,
}

impl Principal {
    /// Same principal with `password` set.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Names of every attached role; empty rather than absent without roles.
    #[must_use]
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|role| role.name.clone()).collect()
    }
}

impl Debug for Principal {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Principal")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_preserve_order() {
        let principal = Principal {
            username: "svc".to_string(),
            password: "secret".to_string(),
            roles: vec![Role::named("b"), Role::named("a")],
        };
        assert_eq!(principal.role_names(), vec!["b", "a"]);
        assert!(!format!("{principal:?}").contains("secret"));
    }

    #[test]
    fn principal_without_roles_has_empty_names() {
        let principal = Principal {
            username: "svc".to_string(),
            password: String::new(),
            roles: Vec::new(),
        };
        assert!(principal.role_names().is_empty());
    }
}
