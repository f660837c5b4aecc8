//! Elasticsearch REST adapter for the [`loghold_core`] store traits.
//!
//! # Design
//! - Every request carries basic auth from the bootstrapped credentials.
//! - 404 becomes [`RemoteError::NotFound`]; any other non-success status is
//!   [`RemoteError::Api`] with the response body kept verbatim.
//! - URLs are built by appending escaped path segments to the endpoint, so
//!   names never need manual encoding.

use std::collections::BTreeMap;

use async_trait::async_trait;
use loghold_core::{
    LifecyclePolicy, PolicyStore, PrincipalBody, PrincipalRecord, PrincipalStore, RemoteError,
    RemoteResult, RoleDefinition,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::credentials::Credentials;

const ILM_POLICY_PATH: [&str; 2] = ["_ilm", "policy"];
const SECURITY_ROLE_PATH: [&str; 2] = ["_security", "role"];
const SECURITY_USER_PATH: [&str; 2] = ["_security", "user"];

#[derive(Deserialize)]
struct PolicyEnvelope {
    policy: LifecyclePolicy,
}

#[derive(Serialize)]
struct PolicyRequest<'a> {
    policy: &'a LifecyclePolicy,
}

#[derive(Deserialize)]
struct UserEntry {
    #[serde(default)]
    roles: Vec<String>,
}

/// Authenticated client for an Elasticsearch-compatible log store.
#[derive(Debug, Clone)]
pub struct ElasticClient {
    http: Client,
    endpoint: Url,
    credentials: Credentials,
}

impl ElasticClient {
    /// Client sending requests through `http` to `endpoint`.
    #[must_use]
    pub const fn new(http: Client, endpoint: Url, credentials: Credentials) -> Self {
        Self {
            http,
            endpoint,
            credentials,
        }
    }

    /// Base URL of the store.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url(&self, operation: &'static str, base: &[&str], name: Option<&str>) -> RemoteResult<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|()| RemoteError::InvalidEndpoint {
                        operation,
                        endpoint: self.endpoint.to_string(),
                    })?;
            segments.pop_if_empty().extend(base);
            if let Some(name) = name {
                segments.push(name);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
    }

    async fn execute(
        &self,
        operation: &'static str,
        name: &str,
        request: RequestBuilder,
    ) -> RemoteResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|err| RemoteError::transport(operation, err))?;
        let status = response.status();
        debug!(operation, name, status = status.as_u16(), "log store responded");

        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound {
                operation,
                name: name.to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                operation,
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> RemoteResult<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|err| RemoteError::transport(operation, err))?;
        serde_json::from_slice(&bytes).map_err(|source| RemoteError::Decode { operation, source })
    }
}

#[async_trait]
impl PolicyStore for ElasticClient {
    async fn get_policy(&self, name: &str) -> RemoteResult<LifecyclePolicy> {
        const OPERATION: &str = "ilm.get";
        let url = self.url(OPERATION, &ILM_POLICY_PATH, Some(name))?;
        let response = self
            .execute(OPERATION, name, self.request(Method::GET, url))
            .await?;
        let mut policies: BTreeMap<String, PolicyEnvelope> =
            Self::decode(OPERATION, response).await?;
        policies
            .remove(name)
            .map(|envelope| envelope.policy)
            .ok_or_else(|| RemoteError::NotFound {
                operation: OPERATION,
                name: name.to_string(),
            })
    }

    async fn put_policy(&self, name: &str, policy: &LifecyclePolicy) -> RemoteResult<()> {
        const OPERATION: &str = "ilm.put";
        let url = self.url(OPERATION, &ILM_POLICY_PATH, Some(name))?;
        let request = self
            .request(Method::PUT, url)
            .json(&PolicyRequest { policy });
        self.execute(OPERATION, name, request).await?;
        Ok(())
    }
}

#[async_trait]
impl PrincipalStore for ElasticClient {
    async fn put_role(&self, name: &str, definition: &RoleDefinition) -> RemoteResult<()> {
        const OPERATION: &str = "role.put";
        let url = self.url(OPERATION, &SECURITY_ROLE_PATH, Some(name))?;
        let request = self.request(Method::PUT, url).json(definition);
        self.execute(OPERATION, name, request).await?;
        Ok(())
    }

    async fn delete_role(&self, name: &str) -> RemoteResult<()> {
        const OPERATION: &str = "role.delete";
        let url = self.url(OPERATION, &SECURITY_ROLE_PATH, Some(name))?;
        self.execute(OPERATION, name, self.request(Method::DELETE, url))
            .await?;
        Ok(())
    }

    async fn put_principal(&self, username: &str, body: &PrincipalBody) -> RemoteResult<()> {
        const OPERATION: &str = "user.put";
        let url = self.url(OPERATION, &SECURITY_USER_PATH, Some(username))?;
        let request = self.request(Method::PUT, url).json(body);
        self.execute(OPERATION, username, request).await?;
        Ok(())
    }

    async fn delete_principal(&self, username: &str) -> RemoteResult<()> {
        const OPERATION: &str = "user.delete";
        let url = self.url(OPERATION, &SECURITY_USER_PATH, Some(username))?;
        self.execute(OPERATION, username, self.request(Method::DELETE, url))
            .await?;
        Ok(())
    }

    async fn list_principals(&self) -> RemoteResult<Vec<PrincipalRecord>> {
        const OPERATION: &str = "user.list";
        let url = self.url(OPERATION, &SECURITY_USER_PATH, None)?;
        let response = self
            .execute(OPERATION, "*", self.request(Method::GET, url))
            .await?;
        let users: BTreeMap<String, UserEntry> = Self::decode(OPERATION, response).await?;
        Ok(users
            .into_iter()
            .map(|(username, entry)| PrincipalRecord {
                username,
                roles: entry.roles,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use loghold_core::{EmptyAction, RoleIndex};
    use serde_json::json;

    const AUTHORIZATION: &str = "Basic ZWxhc3RpYzpjaGFuZ2VtZQ==";

    fn client_for(base: &str) -> Result<ElasticClient> {
        Ok(ElasticClient::new(
            Client::new(),
            Url::parse(base)?,
            Credentials {
                username: "elastic".to_string(),
                password: "changeme".to_string(),
            },
        ))
    }

    fn client(server: &MockServer) -> Result<ElasticClient> {
        client_for(&server.base_url())
    }

    #[tokio::test]
    async fn get_policy_unwraps_named_envelope() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/_ilm/policy/tigera_secure_ee_flows_policy")
                    .header("authorization", AUTHORIZATION);
                then.status(200).json_body(json!({
                    "tigera_secure_ee_flows_policy": {
                        "version": 3,
                        "modified_date": "2024-01-01T00:00:00.000Z",
                        "policy": {
                            "phases": {
                                "hot": {"actions": {
                                    "rollover": {"max_size": "10b", "max_age": "2d"}
                                }},
                                "warm": {"actions": {"readonly": {}}},
                                "delete": {"min_age": "8d", "actions": {"delete": {}}}
                            }
                        }
                    }
                }));
            })
            .await;

        let policy = client(&server)?
            .get_policy("tigera_secure_ee_flows_policy")
            .await?;

        mock.assert_async().await;
        assert_eq!(policy.phases.hot.actions.rollover.max_age, "2d");
        assert_eq!(policy.phases.warm.actions.readonly, Some(EmptyAction {}));
        assert_eq!(policy.phases.delete.min_age, "8d");
        Ok(())
    }

    #[tokio::test]
    async fn missing_policy_is_not_found() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/_ilm/policy/absent");
                then.status(404).json_body(json!({"error": "not found"}));
            })
            .await;

        let err = match client(&server)?.get_policy("absent").await {
            Err(err) => err,
            Ok(_) => return Err(anyhow!("expected not found")),
        };
        assert!(err.is_not_found());
        assert_eq!(err.operation(), "ilm.get");
        Ok(())
    }

    #[tokio::test]
    async fn put_policy_wraps_document() -> Result<()> {
        let server = MockServer::start_async().await;
        let mut policy = LifecyclePolicy::default();
        policy.phases.hot.actions.rollover.max_size = "42b".to_string();
        policy.phases.delete.actions.delete = Some(EmptyAction {});
        let expected = json!({ "policy": serde_json::to_value(&policy)? });

        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/_ilm/policy/p")
                    .header("authorization", AUTHORIZATION)
                    .json_body(expected);
                then.status(200).json_body(json!({"acknowledged": true}));
            })
            .await;

        client(&server)?.put_policy("p", &policy).await?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn server_errors_keep_status_and_body() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/_security/role/r");
                then.status(400).body("bad role");
            })
            .await;

        let result = client(&server)?
            .put_role("r", &RoleDefinition::default())
            .await;
        match result {
            Err(RemoteError::Api {
                operation,
                status,
                body,
            }) => {
                assert_eq!(operation, "role.put");
                assert_eq!(status, 400);
                assert_eq!(body, "bad role");
            }
            other => return Err(anyhow!("unexpected result: {other:?}")),
        }
        Ok(())
    }

    #[tokio::test]
    async fn role_and_principal_writes_use_security_api() -> Result<()> {
        let server = MockServer::start_async().await;
        let definition = RoleDefinition {
            cluster: vec!["monitor".to_string()],
            indices: vec![RoleIndex {
                names: vec!["calico_*".to_string()],
                privileges: vec!["read".to_string()],
            }],
            applications: Vec::new(),
        };
        let role = server
            .mock_async(|when, then| {
                when.method(PUT).path("/_security/role/svc").json_body(json!({
                    "cluster": ["monitor"],
                    "indices": [{"names": ["calico_*"], "privileges": ["read"]}]
                }));
                then.status(200).json_body(json!({"role": {"created": true}}));
            })
            .await;
        let user = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/_security/user/svc")
                    .json_body(json!({"password": "pw", "roles": []}));
                then.status(200).json_body(json!({"created": true}));
            })
            .await;

        let client = client(&server)?;
        client.put_role("svc", &definition).await?;
        client
            .put_principal(
                "svc",
                &PrincipalBody {
                    password: "pw".to_string(),
                    roles: Vec::new(),
                },
            )
            .await?;

        role.assert_async().await;
        user.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn deletes_target_named_resources() -> Result<()> {
        let server = MockServer::start_async().await;
        let role = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/_security/role/svc");
                then.status(200).json_body(json!({"found": true}));
            })
            .await;
        let user = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/_security/user/svc");
                then.status(200).json_body(json!({"found": true}));
            })
            .await;

        let client = client(&server)?;
        client.delete_role("svc").await?;
        client.delete_principal("svc").await?;
        role.assert_async().await;
        user.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn list_principals_extracts_role_names() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/_security/user")
                    .header("authorization", AUTHORIZATION);
                then.status(200).json_body(json!({
                    "elastic": {"username": "elastic", "roles": ["superuser"], "enabled": true},
                    "svc": {"username": "svc", "roles": [], "email": null}
                }));
            })
            .await;

        let principals = client(&server)?.list_principals().await?;
        assert_eq!(
            principals,
            vec![
                PrincipalRecord {
                    username: "elastic".to_string(),
                    roles: vec!["superuser".to_string()],
                },
                PrincipalRecord {
                    username: "svc".to_string(),
                    roles: Vec::new(),
                },
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn malformed_payload_is_decode_error() -> Result<()> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/_security/user");
                then.status(200).body("not json");
            })
            .await;

        let result = client(&server)?.list_principals().await;
        assert!(matches!(
            result,
            Err(RemoteError::Decode {
                operation: "user.list",
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn endpoint_path_prefix_is_preserved() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/es/_security/user/svc");
                then.status(200).json_body(json!({"found": true}));
            })
            .await;

        client_for(&format!("{}/es/", server.base_url()))?
            .delete_principal("svc")
            .await?;
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn opaque_endpoint_is_rejected() -> Result<()> {
        let result = client_for("mailto:store@example.com")?
            .delete_role("svc")
            .await;
        assert!(matches!(
            result,
            Err(RemoteError::InvalidEndpoint {
                operation: "role.delete",
                ..
            })
        ));
        Ok(())
    }
}
