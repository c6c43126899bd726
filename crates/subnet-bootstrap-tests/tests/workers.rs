mod harness;

use futures::executor::block_on;
use harness::{deploy, deploy_with};
use subnet_bootstrap::{
    Error, ErrorClass,
    api::init_workers,
    config::ConfigError,
    dto::{
        outcome::RegisterOutcome,
        page::PageRequest,
        revert::{Revert, SubnetError},
    },
    ops::contract::CallError,
    workflow::bootstrap::BootstrapState,
};
use subnet_bootstrap_testkit::{SimChain, fixtures};

fn reverted_with(err: &Error) -> Option<&SubnetError> {
    match err {
        Error::Call(call) => call.revert().and_then(Revert::subnet),
        _ => None,
    }
}

#[test]
fn init_workers_registers_and_mortgages() {
    let net = deploy();
    let report = block_on(init_workers(&net.session)).expect("init workers");
    let origin = net.session.signer().account;
    let subnet = net.session.subnet().expect("subnet handle");

    assert_eq!(report.state, BootstrapState::WorkersMortgaged);
    assert_eq!(report.region.as_deref(), Some(fixtures::REGION));
    assert_eq!(report.workers, vec![RegisterOutcome::Registered(0)]);
    assert_eq!(report.mortgages, vec![(0, 0)]);

    let region = block_on(subnet.region(&origin, 0)).expect("region");
    assert_eq!(region.as_deref(), Some(fixtures::REGION));

    let (id, worker) = block_on(subnet.mint_worker(&origin, fixtures::worker().p2p_id))
        .expect("mint_worker")
        .expect("worker registered");
    assert_eq!(id, 0);
    assert_eq!(worker.level, 1);
    assert_eq!(worker.port, 10000);
    assert_eq!(worker.ip.to_string(), "xiaobai.asyou.me");
    assert_eq!(worker.owner, net.session.signer().address());
}

#[test]
fn worker_ids_are_not_predicted_without_finality_waits() {
    let mut config = fixtures::config();
    config.chain.wait_finality = false;

    let net = deploy_with(config);
    let report = block_on(init_workers(&net.session)).expect("init workers");
    let origin = net.session.signer().account;
    let subnet = net.session.subnet().expect("subnet handle");

    assert_eq!(report.workers, vec![RegisterOutcome::Registered(0)]);
    assert_eq!(report.mortgages, vec![(0, 0)]);
    assert_eq!(net.chain.pending_len(), 0);

    let mortgages = block_on(subnet.worker_mortgages(&origin, 0)).expect("mortgages");
    assert_eq!(mortgages.len(), 1);
}

#[test]
fn workers_listing_is_newest_first() {
    let net = deploy();
    block_on(init_workers(&net.session)).expect("init workers");
    let origin = net.session.signer().account;
    let subnet = net.session.subnet().expect("subnet handle");

    let page = block_on(subnet.workers(&origin, PageRequest::first(10))).expect("workers");

    assert_eq!(page.len(), 1);
    assert_eq!(page.entries[0].0, 0);
    assert_eq!(page.next_cursor, None);
}

#[test]
fn init_workers_requires_a_subnet_address() {
    let chain = SimChain::new();
    let session = block_on(fixtures::session(&chain, fixtures::config())).expect("connect");

    let err = block_on(init_workers(&session)).expect_err("no subnet configured");

    assert!(matches!(err, Error::Config(ConfigError::Missing(_))));
    assert_eq!(err.class(), ErrorClass::Config);
}

#[test]
fn rerun_skips_known_workers_and_their_mortgages() {
    let net = deploy();
    block_on(init_workers(&net.session)).expect("first run");

    let mut config = fixtures::config();
    config.bootstrap.skip_occupied = true;
    let session = net.session_with(config);
    let report = block_on(init_workers(&session)).expect("second run");

    assert_eq!(report.workers, vec![RegisterOutcome::SlotOccupied(0)]);
    assert!(report.mortgages.is_empty());
    assert_eq!(report.state, BootstrapState::WorkersMortgaged);
}

#[test]
fn rerun_without_skip_occupied_fails_as_already_exists() {
    let net = deploy();
    block_on(init_workers(&net.session)).expect("first run");

    let err = block_on(init_workers(&net.session)).expect_err("worker known");

    assert_eq!(err.class(), ErrorClass::AlreadyExists);
}

#[test]
fn mortgaging_an_unknown_worker_is_rejected() {
    let net = deploy();
    block_on(init_workers(&net.session)).expect("init workers");
    let subnet = net.session.subnet().expect("subnet handle");
    let terms = fixtures::mortgage().to_terms();

    let err = block_on(subnet.worker_mortgage(
        net.session.signer(),
        99,
        &terms,
        net.session.exec_options(),
    ))
    .expect_err("worker 99 does not exist");

    assert_eq!(err.class(), ErrorClass::Rejection);
    assert_eq!(reverted_with(&err), Some(&SubnetError::WorkerNotExist));
    assert!(matches!(err, Error::Call(CallError::Reverted { .. })));
}

#[test]
fn only_the_owner_can_mortgage_a_worker() {
    let net = deploy();
    block_on(init_workers(&net.session)).expect("init workers");
    let subnet = net.session.subnet().expect("subnet handle");
    let bob = fixtures::signer("//Bob").expect("bob");

    let err = block_on(subnet.worker_mortgage(
        &bob,
        0,
        &fixtures::mortgage().to_terms(),
        net.session.exec_options(),
    ))
    .expect_err("bob does not own worker 0");

    assert_eq!(reverted_with(&err), Some(&SubnetError::WorkerNotOwnedByCaller));
}

#[test]
fn workers_need_an_existing_region() {
    let net = deploy();
    let subnet = net.session.subnet().expect("subnet handle");
    let worker = fixtures::worker();

    let err = block_on(subnet.worker_register(
        net.session.signer(),
        &worker.name,
        worker.p2p_id,
        &worker.endpoint.to_endpoint(),
        worker.level,
        3,
        net.session.exec_options(),
    ))
    .expect_err("region 3 was never created");

    assert_eq!(reverted_with(&err), Some(&SubnetError::RegionNotExist));
}
