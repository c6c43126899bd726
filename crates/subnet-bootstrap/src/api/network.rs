use crate::{
    Error,
    api::Session,
    workflow::bootstrap::{
        BootstrapPlan, BootstrapReport, BootstrapState, NetworkArtifacts, NetworkBootstrapper,
    },
};

/// Full bootstrap from the artifacts named in `[artifacts]`.
pub async fn deploy_network(session: &mut Session) -> Result<BootstrapReport, Error> {
    let artifacts = NetworkArtifacts::load(&session.config().artifacts)?;

    deploy_network_with(session, artifacts).await
}

/// Full bootstrap from in-memory artifacts. On success the session records
/// the Subnet and Cloud addresses.
pub async fn deploy_network_with(
    session: &mut Session,
    artifacts: NetworkArtifacts,
) -> Result<BootstrapReport, Error> {
    let plan = BootstrapPlan::from_config(session.config());
    let mut bootstrapper =
        NetworkBootstrapper::new(session.client(), *session.signer(), plan)
            .with_finality(session.config().chain.wait_finality);

    bootstrapper.run_network(artifacts).await?;

    let report = bootstrapper.into_report();
    session.set_contracts(report.subnet_address(), report.cloud_address());

    Ok(report)
}

/// Region, worker registration and mortgages against the Subnet in
/// `[contracts]`, which must already have its validators joined.
pub async fn init_workers(session: &Session) -> Result<BootstrapReport, Error> {
    let subnet = session.subnet_address()?;
    let plan = BootstrapPlan::from_config(session.config());

    let mut bootstrapper = NetworkBootstrapper::attach(
        session.client(),
        *session.signer(),
        plan,
        subnet,
        BootstrapState::ValidatorsJoined,
    )
    .with_finality(session.config().chain.wait_finality);

    bootstrapper.run_workers().await?;

    Ok(bootstrapper.into_report())
}
