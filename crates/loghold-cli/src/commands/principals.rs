use loghold_access::{
    AccessError, Principal, PrincipalSynchronizer, dashboard_installer_principal,
    linseed_principal,
};
use loghold_store::ElasticClient;

use crate::cli::{OutputFormat, ProvisionArgs, TargetArgs};
use crate::client::{AppContext, CliError, CliResult, resolve_password};
use crate::output::render_principals;

pub(crate) async fn handle_principals_list(
    ctx: &AppContext,
    format: OutputFormat,
) -> CliResult<()> {
    let client = ctx.connect().await?;
    let principals = PrincipalSynchronizer::new(&client)
        .list_principals()
        .await
        .map_err(access_failure)?;
    render_principals(&principals, format)
}

pub(crate) async fn handle_principals_provision(
    ctx: &AppContext,
    args: &ProvisionArgs,
) -> CliResult<()> {
    let password = resolve_password(&args.password_env, |name| std::env::var(name).ok())?;
    let client = ctx.connect().await?;
    provision(&client, &args.target, &password).await
}

pub(crate) async fn handle_principals_retract(
    ctx: &AppContext,
    args: &TargetArgs,
) -> CliResult<()> {
    let client = ctx.connect().await?;
    retract(&client, args).await
}

fn well_known(target: &TargetArgs) -> [Principal; 2] {
    [
        linseed_principal(&target.cluster, &target.tenant),
        dashboard_installer_principal(&target.cluster, &target.tenant),
    ]
}

async fn provision(client: &ElasticClient, target: &TargetArgs, password: &str) -> CliResult<()> {
    let synchronizer = PrincipalSynchronizer::new(client);
    for principal in well_known(target) {
        let principal = principal.with_password(password);
        synchronizer
            .create_principal(&principal)
            .await
            .map_err(access_failure)?;
        println!("Provisioned {}.", principal.username);
    }
    Ok(())
}

async fn retract(client: &ElasticClient, target: &TargetArgs) -> CliResult<()> {
    let synchronizer = PrincipalSynchronizer::new(client);
    for principal in well_known(target) {
        synchronizer
            .delete_principal(&principal)
            .await
            .map_err(access_failure)?;
        println!("Retracted {}.", principal.username);
    }
    Ok(())
}

fn access_failure(err: AccessError) -> CliError {
    match err {
        AccessError::InvalidRole { reason } => {
            CliError::validation(format!("invalid role definition: {reason}"))
        }
        AccessError::Remote { ref name, .. } => {
            let message = format!("principal operation on {name} failed");
            CliError::failure(anyhow::Error::new(err).context(message))
        }
    }
}
