use futures::executor::block_on;
use subnet_bootstrap::{
    ErrorClass, api::ensure_account_mapping, dto::outcome::MappingOutcome, infra::ChainClient,
};
use subnet_bootstrap_testkit::{SimChain, fixtures};

#[test]
fn mapping_happens_once() {
    let chain = SimChain::new();
    let session = block_on(fixtures::session(&chain, fixtures::config())).expect("connect");
    let signer = *session.signer();

    let first = block_on(ensure_account_mapping(&session)).expect("first mapping");
    let second = block_on(ensure_account_mapping(&session)).expect("second mapping");

    assert_eq!(first, MappingOutcome::Mapped);
    assert_eq!(second, MappingOutcome::AlreadyMapped);

    let original = block_on(chain.original_account(&signer.address())).expect("lookup");
    assert_eq!(original, Some(signer.account));
}

#[test]
fn unfinalized_mapping_is_not_yet_visible() {
    let chain = SimChain::new();
    let mut config = fixtures::config();
    config.chain.wait_finality = false;
    let session = block_on(fixtures::session(&chain, config)).expect("connect");
    let signer = *session.signer();

    let outcome = block_on(ensure_account_mapping(&session)).expect("mapping");
    assert_eq!(outcome, MappingOutcome::Mapped);
    assert_eq!(
        block_on(chain.original_account(&signer.address())).expect("lookup"),
        None
    );

    chain.finalize();
    assert_eq!(
        block_on(chain.original_account(&signer.address())).expect("lookup"),
        Some(signer.account)
    );
}

#[test]
fn malformed_seed_is_a_config_error() {
    let chain = SimChain::new();
    let mut config = fixtures::config();
    config.signer.seed = "alice".to_string();

    let Err(err) = block_on(fixtures::session(&chain, config)) else {
        panic!("seed without // or 0x must be refused");
    };

    assert_eq!(err.class(), ErrorClass::Config);
}
