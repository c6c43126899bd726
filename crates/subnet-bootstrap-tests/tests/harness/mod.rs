#![allow(dead_code)]

use futures::executor::block_on;
use std::{env, fs, path::PathBuf};
use subnet_bootstrap::{
    api::{Session, deploy_network_with},
    config::ConfigModel,
    ids::DeployedAddress,
    workflow::bootstrap::BootstrapReport,
};
use subnet_bootstrap_testkit::{SimChain, fixtures};

///
/// Net
/// A chain with the reference network deployed on it.
///

pub struct Net {
    pub chain: SimChain,
    pub session: Session,
    pub report: BootstrapReport,
}

impl Net {
    pub fn subnet(&self) -> DeployedAddress {
        self.report.subnet_address().expect("subnet address")
    }

    pub fn cloud(&self) -> DeployedAddress {
        self.report.cloud_address().expect("cloud address")
    }

    /// A second session on the same chain, sharing the deployed addresses.
    pub fn session_with(&self, mut config: ConfigModel) -> Session {
        config.contracts = self.session.config().contracts.clone();

        block_on(fixtures::session(&self.chain, config)).expect("connect session")
    }
}

pub fn deploy() -> Net {
    deploy_with(fixtures::config())
}

pub fn deploy_with(config: ConfigModel) -> Net {
    let chain = SimChain::new();
    let mut session = block_on(fixtures::session(&chain, config)).expect("connect session");
    let report =
        block_on(deploy_network_with(&mut session, fixtures::artifacts(1))).expect("deploy network");

    Net {
        chain,
        session,
        report,
    }
}

/// Fresh scratch directory for one test.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("subnet-bootstrap-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");

    dir
}
