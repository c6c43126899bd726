//!
//! Reference deployment: three validators behind one host, plus one worker
//! in a single region.
//!

use crate::{DevKeyring, Fake, SimChain, artifact};
use std::{fs, io, net::Ipv4Addr, path::Path};
use subnet_bootstrap::{
    Error,
    api::Session,
    config::schema::{
        ArtifactsConfig, BootstrapConfig, ConfigModel, EndpointConfig, MortgageConfig,
        ValidatorConfig, WorkerConfig, WorkersConfig,
    },
    ids::ContractKind,
    infra::{Keyring, Signer},
    workflow::bootstrap::NetworkArtifacts,
};

pub const GOV_SEED: &str = "//Alice";
pub const NETWORK_ID: u16 = 42;
pub const VALIDATOR_HOST: Ipv4Addr = Ipv4Addr::new(192, 168, 110, 205);
pub const VALIDATOR_PORTS: [u16; 3] = [30110, 30120, 30130];
pub const REGION: &str = "defalut";

#[must_use]
pub fn validators() -> Vec<ValidatorConfig> {
    VALIDATOR_PORTS
        .iter()
        .zip(0u32..)
        .map(|(port, i)| ValidatorConfig {
            name: format!("node{i}"),
            validator_id: Fake::account(100 + i),
            p2p_id: Fake::account(200 + i),
            endpoint: EndpointConfig {
                ipv4: Some(VALIDATOR_HOST),
                port: *port,
                ..Default::default()
            },
        })
        .collect()
}

#[must_use]
pub const fn mortgage() -> MortgageConfig {
    MortgageConfig {
        cpu: 10_000,
        mem: 10_000,
        cvm_cpu: 0,
        cvm_mem: 0,
        disk: 1_000_000,
        gpu: 0,
        deposit: 10_000_000,
    }
}

#[must_use]
pub fn worker() -> WorkerConfig {
    WorkerConfig {
        name: "worker0".to_string(),
        p2p_id: Fake::account(300),
        endpoint: EndpointConfig {
            domain: Some("xiaobai.asyou.me".to_string()),
            port: 10000,
            ..Default::default()
        },
        level: 1,
        region_id: 0,
        mortgages: vec![mortgage()],
    }
}

/// Full network config with fixed salts, so reruns target the same
/// addresses.
#[must_use]
pub fn config() -> ConfigModel {
    let mut cfg = ConfigModel::default();
    cfg.chain.network_id = NETWORK_ID;
    cfg.signer.seed = GOV_SEED.to_string();
    cfg.bootstrap = BootstrapConfig {
        skip_occupied: false,
        subnet_salt: Some(Fake::salt(1)),
        cloud_salt: Some(Fake::salt(2)),
        boot_nodes: vec![0, 1, 2],
        joins: vec![1, 2],
        validators: validators(),
    };
    cfg.workers = Some(WorkersConfig {
        region: REGION.to_string(),
        nodes: vec![worker()],
    });

    cfg
}

/// Salts drawn fresh on every run.
#[must_use]
pub fn unsalted_config() -> ConfigModel {
    let mut cfg = config();
    cfg.bootstrap.subnet_salt = None;
    cfg.bootstrap.cloud_salt = None;

    cfg
}

#[must_use]
pub fn artifacts(version: u32) -> NetworkArtifacts {
    NetworkArtifacts {
        pod: artifact::code(ContractKind::Pod, version),
        subnet: artifact::code(ContractKind::Subnet, version),
        cloud: artifact::code(ContractKind::Cloud, version),
    }
}

/// Write the three artifacts under `dir` and point a config at them.
pub fn write_artifacts(dir: &Path, version: u32) -> io::Result<ArtifactsConfig> {
    let paths = ArtifactsConfig {
        pod: dir.join("pod.polkavm"),
        subnet: dir.join("subnet.polkavm"),
        cloud: dir.join("cloud.polkavm"),
    };
    let blobs = artifacts(version);

    fs::create_dir_all(dir)?;
    fs::write(&paths.pod, blobs.pod)?;
    fs::write(&paths.subnet, blobs.subnet)?;
    fs::write(&paths.cloud, blobs.cloud)?;

    Ok(paths)
}

/// Signer for a dev URI on the fixture network.
pub fn signer(seed: &str) -> Result<Signer, Error> {
    Ok(DevKeyring.pair_from_seed(seed, NETWORK_ID)?)
}

/// Connect a session to `chain` with the dev keyring.
pub async fn session(chain: &SimChain, config: ConfigModel) -> Result<Session, Error> {
    Session::connect(config, chain, &DevKeyring).await
}

