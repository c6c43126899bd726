mod harness;

use futures::executor::block_on;
use harness::{deploy, scratch_dir};
use subnet_bootstrap::{
    Error, ErrorClass,
    api::{upgrade_cloud, upgrade_contract, upgrade_subnet},
    dto::outcome::UpgradeOutcome,
    ids::{CodeHandle, ContractKind},
    infra::ChainClient,
    ops::{deploy::CodeSource, upgrade::UpgradeError},
};
use subnet_bootstrap_testkit::{Fake, artifact, fixtures};

#[test]
fn upgrade_keeps_address_and_state() {
    let net = deploy();
    let address = net.subnet();
    let v2 = artifact::code(ContractKind::Subnet, 2);

    let outcome = block_on(upgrade_contract(
        &net.session,
        ContractKind::Subnet,
        address,
        CodeSource::Upload(v2.clone()),
    ))
    .expect("upgrade");
    assert_eq!(outcome, UpgradeOutcome::Upgraded);

    let info = block_on(net.session.client().contract_info(&address))
        .expect("contract_info")
        .expect("still deployed");
    assert_eq!(info.code_hash, CodeHandle::of(&v2));

    let origin = net.session.signer().account;
    let subnet = net.session.subnet().expect("subnet handle");
    let secrets = block_on(subnet.secrets(&origin)).expect("secrets");
    assert_eq!(secrets.len(), 3, "storage survives the code swap");
}

#[test]
fn upgrading_to_the_running_code_is_a_no_op() {
    let net = deploy();

    let outcome = block_on(upgrade_contract(
        &net.session,
        ContractKind::Subnet,
        net.subnet(),
        CodeSource::Upload(artifact::code(ContractKind::Subnet, 1)),
    ))
    .expect("upgrade");

    assert_eq!(outcome, UpgradeOutcome::AlreadyCurrent);
}

#[test]
fn non_governance_signer_is_rejected() {
    let net = deploy();
    let mut config = fixtures::config();
    config.signer.seed = "//Bob".to_string();
    let bob = net.session_with(config);

    let err = block_on(upgrade_contract(
        &bob,
        ContractKind::Cloud,
        net.cloud(),
        CodeSource::Upload(artifact::code(ContractKind::Cloud, 2)),
    ))
    .expect_err("bob is not governance");

    assert!(matches!(err, Error::Upgrade(UpgradeError::Rejected { .. })));
    assert_eq!(err.class(), ErrorClass::Rejection);
}

#[test]
fn incompatible_code_is_rejected() {
    let net = deploy();

    let err = block_on(upgrade_contract(
        &net.session,
        ContractKind::Subnet,
        net.subnet(),
        CodeSource::Upload(artifact::code(ContractKind::Cloud, 9)),
    ))
    .expect_err("cloud code on a subnet");

    assert_eq!(err.class(), ErrorClass::Rejection);

    let info = block_on(net.session.client().contract_info(&net.subnet()))
        .expect("contract_info")
        .expect("still deployed");
    assert_eq!(
        info.code_hash,
        CodeHandle::of(&artifact::code(ContractKind::Subnet, 1))
    );
}

#[test]
fn upgrading_an_empty_address_needs_a_deployment() {
    let net = deploy();

    let err = block_on(upgrade_contract(
        &net.session,
        ContractKind::Subnet,
        Fake::address(77),
        CodeSource::Upload(artifact::code(ContractKind::Subnet, 2)),
    ))
    .expect_err("nothing deployed there");

    assert!(matches!(err, Error::Upgrade(UpgradeError::NotDeployed { .. })));
    assert_eq!(err.class(), ErrorClass::Dependency);
}

#[test]
fn configured_artifacts_drive_upgrades() {
    let net = deploy();
    let dir = scratch_dir("upgrade-from-disk");
    let mut config = fixtures::config();
    config.artifacts = fixtures::write_artifacts(&dir, 2).expect("write artifacts");
    let session = net.session_with(config);

    let subnet = block_on(upgrade_subnet(&session)).expect("upgrade subnet");
    let cloud = block_on(upgrade_cloud(&session)).expect("upgrade cloud");

    assert_eq!(subnet, UpgradeOutcome::Upgraded);
    assert_eq!(cloud, UpgradeOutcome::Upgraded);

    let origin = session.signer().account;
    let bound = block_on(session.cloud().expect("cloud").subnet_address(&origin))
        .expect("subnet_address");
    assert_eq!(bound, net.subnet());
}
