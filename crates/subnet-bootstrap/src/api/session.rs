use crate::{
    Error,
    config::{ConfigError, ConfigModel},
    ids::DeployedAddress,
    infra::{ChainClient, ChainConnector, Keyring, Signer},
    log,
    log::{LogBuffer, Topic},
    ops::contract::{CloudContract, ExecOptions, SubnetContract},
};
use std::sync::Arc;

///
/// Session
///
/// A connected client, the signer and the loaded config.
///

#[derive(Clone)]
pub struct Session {
    client: Arc<dyn ChainClient>,
    signer: Signer,
    config: ConfigModel,
}

impl Session {
    #[must_use]
    pub fn new(client: Arc<dyn ChainClient>, signer: Signer, config: ConfigModel) -> Self {
        Self {
            client,
            signer,
            config,
        }
    }

    /// Apply log settings, connect to the configured endpoints and derive
    /// the signer from the configured seed.
    pub async fn connect(
        config: ConfigModel,
        connector: &dyn ChainConnector,
        keyring: &dyn Keyring,
    ) -> Result<Self, Error> {
        let max_entries = usize::try_from(config.log.max_entries).unwrap_or(usize::MAX);
        LogBuffer::configure(config.log.level, max_entries);

        let client = connector.connect(&config.chain.endpoints).await?;
        let signer = keyring.pair_from_seed(&config.signer.seed, config.chain.network_id)?;

        log!(
            Topic::Config,
            Info,
            "session: {} via {}",
            signer,
            config.chain.endpoints.join(", ")
        );

        Ok(Self::new(client, signer, config))
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn ChainClient> {
        self.client.clone()
    }

    #[must_use]
    pub const fn signer(&self) -> &Signer {
        &self.signer
    }

    #[must_use]
    pub const fn config(&self) -> &ConfigModel {
        &self.config
    }

    /// Record the addresses of a deployment for later entry points.
    pub const fn set_contracts(
        &mut self,
        subnet: Option<DeployedAddress>,
        cloud: Option<DeployedAddress>,
    ) {
        self.config.contracts.subnet = subnet;
        self.config.contracts.cloud = cloud;
    }

    /// Exec options following `[chain].wait_finality`.
    #[must_use]
    pub const fn exec_options(&self) -> ExecOptions {
        if self.config.chain.wait_finality {
            ExecOptions::finalized()
        } else {
            ExecOptions::fire_and_forget()
        }
    }

    pub fn subnet_address(&self) -> Result<DeployedAddress, ConfigError> {
        self.config
            .contracts
            .subnet
            .ok_or(ConfigError::Missing("contracts.subnet"))
    }

    pub fn cloud_address(&self) -> Result<DeployedAddress, ConfigError> {
        self.config
            .contracts
            .cloud
            .ok_or(ConfigError::Missing("contracts.cloud"))
    }

    pub fn subnet(&self) -> Result<SubnetContract, Error> {
        Ok(SubnetContract::new(self.subnet_address()?, self.client()))
    }

    pub fn cloud(&self) -> Result<CloudContract, Error> {
        Ok(CloudContract::new(self.cloud_address()?, self.client()))
    }
}
