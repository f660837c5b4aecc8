//! Deterministic principal names, index patterns and the well-known principals.

use loghold_core::{ApplicationPrivilege, RoleDefinition, RoleIndex};

use crate::model::{Principal, Role};

/// Base name of the log ingestion principal.
pub const LINSEED_USER: &str = "tigera-ee-linseed";
/// Base name of the dashboard installer principal.
pub const DASHBOARD_INSTALLER_USER: &str = "tigera-ee-dashboards-installer";

const TIMESERIES_INDEX_PREFIX: &str = "tigera_secure_ee_*";
const LEGACY_INDEX_PATTERN: &str = "calico_*";
const DASHBOARD_APPLICATION: &str = "kibana-.kibana";

/// `"{name}_{cluster}_{tenant}"`; an empty tenant leaves a trailing `_`.
#[must_use]
pub fn format_name(name: &str, cluster_id: &str, tenant_id: &str) -> String {
    format!("{name}_{cluster_id}_{tenant_id}")
}

/// Index pattern scoped to a cluster and, when non-empty, a tenant.
#[must_use]
pub fn index_pattern(prefix: &str, cluster: &str, suffix: &str, tenant: &str) -> String {
    if tenant.is_empty() {
        format!("{prefix}.{cluster}{suffix}")
    } else {
        format!("{prefix}.{tenant}.{cluster}{suffix}")
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// Principal used by the log ingestion service, with a role of the same name.
#[must_use]
pub fn linseed_principal(cluster_id: &str, tenant_id: &str) -> Principal {
    let username = format_name(LINSEED_USER, cluster_id, tenant_id);
    let definition = RoleDefinition {
        cluster: strings(&["monitor", "manage_index_templates", "manage_ilm"]),
        indices: vec![RoleIndex {
            // Single-index and multi-index name formats.
            names: vec![
                index_pattern(TIMESERIES_INDEX_PREFIX, "*", ".*", tenant_id),
                LEGACY_INDEX_PATTERN.to_string(),
            ],
            privileges: strings(&["create_index", "write", "manage", "read"]),
        }],
        applications: Vec::new(),
    };
    Principal {
        roles: vec![Role {
            name: username.clone(),
            definition: Some(definition),
        }],
        username,
        password: String::new(),
    }
}

/// Principal used to install dashboards, with a role of the same name.
#[must_use]
pub fn dashboard_installer_principal(cluster_id: &str, tenant_id: &str) -> Principal {
    let username = format_name(DASHBOARD_INSTALLER_USER, cluster_id, tenant_id);
    let definition = RoleDefinition {
        cluster: Vec::new(),
        indices: Vec::new(),
        applications: vec![ApplicationPrivilege {
            application: DASHBOARD_APPLICATION.to_string(),
            privileges: strings(&["all"]),
            resources: strings(&["*"]),
        }],
    };
    Principal {
        roles: vec![Role {
            name: username.clone(),
            definition: Some(definition),
        }],
        username,
        password: String::new(),
    }
}
