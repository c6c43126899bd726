mod bootstrap;
mod log;
mod workers;

pub use bootstrap::*;
pub use log::*;
pub use workers::*;

use crate::{
    dto::endpoint::{Endpoint, Ip},
    ids::DeployedAddress,
};
use serde::{Deserialize, Serialize};
use std::{
    net::{Ipv4Addr, Ipv6Addr},
    path::PathBuf,
};
use thiserror::Error as ThisError;

///
/// ConfigSchemaError
///

#[derive(Debug, ThisError)]
pub enum ConfigSchemaError {
    #[error("validation error: {0}")]
    ValidationError(String),
}

pub const NAME_MAX_BYTES: usize = 40;

fn validate_name(name: &str, context: &str) -> Result<(), ConfigSchemaError> {
    if name.is_empty() {
        return Err(ConfigSchemaError::ValidationError(format!(
            "{context} name must not be empty"
        )));
    }
    if name.len() > NAME_MAX_BYTES {
        return Err(ConfigSchemaError::ValidationError(format!(
            "{context} '{name}' exceeds {NAME_MAX_BYTES} bytes",
        )));
    }

    Ok(())
}

///
/// Validate
///

pub trait Validate {
    fn validate(&self) -> Result<(), ConfigSchemaError>;
}

///
/// ConfigModel
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigModel {
    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub signer: SignerConfig,

    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    // addresses of an existing deployment, for upgrade and worker-only runs
    #[serde(default)]
    pub contracts: ContractsConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    #[serde(default)]
    pub workers: Option<WorkersConfig>,
}

impl Validate for ConfigModel {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        self.chain.validate()?;
        self.log.validate()?;
        self.bootstrap.validate()?;
        if let Some(workers) = &self.workers {
            workers.validate()?;
        }

        Ok(())
    }
}

///
/// Defaults
///

mod defaults {
    use std::path::PathBuf;

    pub fn endpoints() -> Vec<String> {
        vec!["ws://127.0.0.1:9944".to_string()]
    }

    pub const fn network_id() -> u16 {
        42
    }

    pub const fn wait_finality() -> bool {
        true
    }

    pub fn seed() -> String {
        "//Alice".to_string()
    }

    pub fn pod_artifact() -> PathBuf {
        PathBuf::from("target/ink/pod/pod.polkavm")
    }

    pub fn subnet_artifact() -> PathBuf {
        PathBuf::from("target/ink/subnet/subnet.polkavm")
    }

    pub fn cloud_artifact() -> PathBuf {
        PathBuf::from("target/ink/cloud/cloud.polkavm")
    }
}

///
/// ChainConfig
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
    #[serde(default = "defaults::endpoints")]
    pub endpoints: Vec<String>,

    #[serde(default = "defaults::network_id")]
    pub network_id: u16,

    /// Default finality mode for exec calls.
    #[serde(default = "defaults::wait_finality")]
    pub wait_finality: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            endpoints: defaults::endpoints(),
            network_id: defaults::network_id(),
            wait_finality: defaults::wait_finality(),
        }
    }
}

impl Validate for ChainConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        if self.endpoints.is_empty() {
            return Err(ConfigSchemaError::ValidationError(
                "chain.endpoints must list at least one endpoint".to_string(),
            ));
        }
        if let Some(bad) = self.endpoints.iter().find(|e| e.trim().is_empty()) {
            return Err(ConfigSchemaError::ValidationError(format!(
                "chain endpoint '{bad}' is blank"
            )));
        }

        Ok(())
    }
}

///
/// SignerConfig
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SignerConfig {
    #[serde(default = "defaults::seed")]
    pub seed: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            seed: defaults::seed(),
        }
    }
}

///
/// ArtifactsConfig
/// Paths of the compiled contract blobs.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactsConfig {
    #[serde(default = "defaults::pod_artifact")]
    pub pod: PathBuf,

    #[serde(default = "defaults::subnet_artifact")]
    pub subnet: PathBuf,

    #[serde(default = "defaults::cloud_artifact")]
    pub cloud: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            pod: defaults::pod_artifact(),
            subnet: defaults::subnet_artifact(),
            cloud: defaults::cloud_artifact(),
        }
    }
}

///
/// ContractsConfig
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContractsConfig {
    #[serde(default)]
    pub subnet: Option<DeployedAddress>,

    #[serde(default)]
    pub cloud: Option<DeployedAddress>,
}

///
/// EndpointConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    #[serde(default)]
    pub ipv4: Option<Ipv4Addr>,

    #[serde(default)]
    pub ipv6: Option<Ipv6Addr>,

    #[serde(default)]
    pub domain: Option<String>,

    pub port: u16,
}

impl EndpointConfig {
    #[must_use]
    pub fn to_endpoint(&self) -> Endpoint {
        let ip = Ip {
            ipv4: self.ipv4.map(Ipv4Addr::to_bits),
            ipv6: self.ipv6.map(Ipv6Addr::to_bits),
            domain: self.domain.as_ref().map(|d| d.as_bytes().to_vec()),
        };

        Endpoint::new(ip, u32::from(self.port))
    }
}

impl Validate for EndpointConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        let blank_domain = self.domain.as_deref().is_some_and(|d| d.trim().is_empty());
        if blank_domain {
            return Err(ConfigSchemaError::ValidationError(
                "endpoint domain is blank".to_string(),
            ));
        }
        if self.ipv4.is_none() && self.ipv6.is_none() && self.domain.is_none() {
            return Err(ConfigSchemaError::ValidationError(
                "endpoint needs one of ipv4, ipv6 or domain".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigSchemaError::ValidationError(
                "endpoint port must be non-zero".to_string(),
            ));
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_without_address_is_invalid() {
        let cfg = EndpointConfig {
            port: 30110,
            ..Default::default()
        };

        assert!(cfg.validate().is_err());
    }

    #[test]
    fn endpoint_converts_ipv4_to_integer_form() {
        let cfg = EndpointConfig {
            ipv4: Some(Ipv4Addr::new(192, 168, 110, 205)),
            port: 30110,
            ..Default::default()
        };

        let endpoint = cfg.to_endpoint();
        assert_eq!(endpoint.ip.ipv4, Some(3_232_263_885));
        assert_eq!(endpoint.port, 30110);
    }

    #[test]
    fn blank_chain_endpoint_is_invalid() {
        let cfg = ChainConfig {
            endpoints: vec![" ".to_string()],
            ..Default::default()
        };

        assert!(cfg.validate().is_err());
    }

    #[test]
    fn long_names_are_rejected() {
        let name = "n".repeat(NAME_MAX_BYTES + 1);

        assert!(validate_name(&name, "validator").is_err());
        assert!(validate_name("node0", "validator").is_ok());
        assert!(validate_name("", "validator").is_err());
    }
}
