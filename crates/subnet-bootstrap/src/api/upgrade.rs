use crate::{
    Error,
    api::Session,
    dto::outcome::UpgradeOutcome,
    ids::{ContractKind, DeployedAddress},
    ops::{artifact::read_artifact, deploy::CodeSource, upgrade::ContractUpgrader},
};

/// Upload the configured Subnet artifact and swap it in.
pub async fn upgrade_subnet(session: &Session) -> Result<UpgradeOutcome, Error> {
    let address = session.subnet_address()?;
    let code = read_artifact(&session.config().artifacts.subnet)?;

    upgrade_contract(session, ContractKind::Subnet, address, CodeSource::Upload(code)).await
}

/// Upload the configured Cloud artifact and swap it in.
pub async fn upgrade_cloud(session: &Session) -> Result<UpgradeOutcome, Error> {
    let address = session.cloud_address()?;
    let code = read_artifact(&session.config().artifacts.cloud)?;

    upgrade_contract(session, ContractKind::Cloud, address, CodeSource::Upload(code)).await
}

pub async fn upgrade_contract(
    session: &Session,
    kind: ContractKind,
    address: DeployedAddress,
    code: CodeSource,
) -> Result<UpgradeOutcome, Error> {
    ContractUpgrader::new(session.client())
        .upgrade(kind, address, code, session.signer())
        .await
}
