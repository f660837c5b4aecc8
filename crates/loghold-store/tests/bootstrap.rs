//! End-to-end: mounted secrets, bootstrap, and both reconcilers against a mock store.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use httpmock::prelude::*;
use loghold_access::{PrincipalSynchronizer, linseed_principal};
use loghold_policy::{LogCategory, PolicyOutcome, PolicyReconciler, RetentionPlan, StorageSettings};
use loghold_store::secrets::{
    ADMIN_CREDENTIALS_SECRET, CA_CERT_KEY, EXTERNAL_CA_SECRET, INTERNAL_CA_SECRET,
};
use loghold_store::{BootstrapError, Bootstrapper, ConnectionSettings, DirectorySecretSource};
use reqwest::Url;
use serde_json::json;

const CA_PEM: &[u8] = include_bytes!("fixtures/ca.crt");

fn mount(root: &Path, secret: &str, key: &str, value: &[u8]) -> Result<()> {
    let dir = root.join(secret);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(key), value)?;
    Ok(())
}

fn mount_internal(root: &Path) -> Result<()> {
    mount(root, ADMIN_CREDENTIALS_SECRET, "elastic", b"changeme")?;
    mount(root, INTERNAL_CA_SECRET, CA_CERT_KEY, CA_PEM)
}

fn authorization() -> String {
    format!("Basic {}", STANDARD.encode("elastic:changeme"))
}

fn bootstrapper(root: &Path) -> Bootstrapper {
    Bootstrapper::new(Arc::new(DirectorySecretSource::new(root)))
}

#[tokio::test]
async fn reconciles_every_category_through_bootstrapped_client() -> Result<()> {
    let secrets = tempfile::tempdir()?;
    mount_internal(secrets.path())?;
    let server = MockServer::start_async().await;
    let plan = RetentionPlan::from_settings(&StorageSettings::default());

    let mut puts = Vec::new();
    for entry in &plan.entries {
        let path = format!("/_ilm/policy/{}", entry.policy_name());
        let get_path = path.clone();
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(get_path)
                    .header("authorization", authorization());
                then.status(404).json_body(json!({"error": "missing"}));
            })
            .await;
        let body = json!({ "policy": serde_json::to_value(entry.document())? });
        puts.push(
            server
                .mock_async(|when, then| {
                    when.method(PUT)
                        .path(path)
                        .header("authorization", authorization())
                        .json_body(body);
                    then.status(200).json_body(json!({"acknowledged": true}));
                })
                .await,
        );
    }

    let settings = ConnectionSettings::new(Url::parse(&server.base_url())?);
    let client = bootstrapper(secrets.path()).connect(&settings).await?;
    let outcomes = PolicyReconciler::new(&client).reconcile(&plan).await?;

    assert_eq!(outcomes.len(), LogCategory::ALL.len());
    assert!(outcomes.iter().all(|o| o.outcome == PolicyOutcome::Created));
    for put in &puts {
        put.assert_async().await;
    }
    Ok(())
}

#[tokio::test]
async fn provisions_principal_with_role_first() -> Result<()> {
    let secrets = tempfile::tempdir()?;
    mount_internal(secrets.path())?;
    let server = MockServer::start_async().await;
    let principal = linseed_principal("cluster-a", "t1").with_password("s3cret");

    let role = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path(format!("/_security/role/{}", principal.username))
                .header("authorization", authorization());
            then.status(200).json_body(json!({"role": {"created": true}}));
        })
        .await;
    let user = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path(format!("/_security/user/{}", principal.username))
                .json_body(json!({
                    "password": "s3cret",
                    "roles": [principal.username.clone()]
                }));
            then.status(200).json_body(json!({"created": true}));
        })
        .await;

    let settings = ConnectionSettings::new(Url::parse(&server.base_url())?);
    let client = bootstrapper(secrets.path()).connect(&settings).await?;
    PrincipalSynchronizer::new(&client)
        .create_principal(&principal)
        .await?;

    role.assert_async().await;
    user.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn empty_mount_reports_waiting() -> Result<()> {
    let secrets = tempfile::tempdir()?;
    let settings = ConnectionSettings::new(Url::parse("https://log-store.example:9200")?);

    let err = match bootstrapper(secrets.path()).connect(&settings).await {
        Err(err) => err,
        Ok(_) => return Err(anyhow!("expected waiting error")),
    };
    assert!(err.is_waiting());
    Ok(())
}

#[tokio::test]
async fn external_without_client_certs_is_config_error() -> Result<()> {
    let secrets = tempfile::tempdir()?;
    mount(secrets.path(), ADMIN_CREDENTIALS_SECRET, "elastic", b"changeme")?;
    mount(secrets.path(), EXTERNAL_CA_SECRET, CA_CERT_KEY, CA_PEM)?;
    let mut settings = ConnectionSettings::new(Url::parse("https://log-store.example:9200")?);
    settings.external = true;

    let result = bootstrapper(secrets.path()).connect(&settings).await;
    assert!(matches!(result, Err(BootstrapError::Config { .. })));
    Ok(())
}

#[tokio::test]
async fn multi_entry_credentials_are_rejected() -> Result<()> {
    let secrets = tempfile::tempdir()?;
    mount_internal(secrets.path())?;
    mount(secrets.path(), ADMIN_CREDENTIALS_SECRET, "second", b"user")?;
    let settings = ConnectionSettings::new(Url::parse("https://log-store.example:9200")?);

    let result = bootstrapper(secrets.path()).resolve(&settings).await;
    assert!(matches!(
        result,
        Err(BootstrapError::Config {
            reason: "expected_single_entry",
            ..
        })
    ));
    Ok(())
}
