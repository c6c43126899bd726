use super::{ConfigSchemaError, EndpointConfig, Validate, validate_name};
use crate::{dto::mortgage::MortgageTerms, ids::AccountId};
use serde::{Deserialize, Serialize};

///
/// WorkersConfig
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkersConfig {
    /// Region created before any worker registers.
    pub region: String,

    #[serde(default)]
    pub nodes: Vec<WorkerConfig>,
}

impl Validate for WorkersConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        validate_name(&self.region, "region")?;
        for node in &self.nodes {
            node.validate()?;
        }

        Ok(())
    }
}

///
/// WorkerConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    pub name: String,
    pub p2p_id: AccountId,
    pub endpoint: EndpointConfig,
    pub level: u8,

    #[serde(default)]
    pub region_id: u32,

    #[serde(default)]
    pub mortgages: Vec<MortgageConfig>,
}

impl Validate for WorkerConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        validate_name(&self.name, "worker")?;
        self.endpoint.validate()?;

        if let Some(idx) = self.mortgages.iter().position(|m| m.deposit == 0) {
            return Err(ConfigSchemaError::ValidationError(format!(
                "worker '{}' mortgage #{idx} has no deposit",
                self.name
            )));
        }

        Ok(())
    }
}

///
/// MortgageConfig
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MortgageConfig {
    pub cpu: u32,
    pub mem: u32,

    #[serde(default)]
    pub cvm_cpu: u32,

    #[serde(default)]
    pub cvm_mem: u32,

    pub disk: u32,

    #[serde(default)]
    pub gpu: u32,

    pub deposit: u64,
}

impl MortgageConfig {
    #[must_use]
    pub fn to_terms(&self) -> MortgageTerms {
        MortgageTerms {
            cpu: self.cpu,
            mem: self.mem,
            cvm_cpu: self.cvm_cpu,
            cvm_mem: self.cvm_mem,
            disk: self.disk,
            gpu: self.gpu,
            deposit: u128::from(self.deposit),
        }
    }
}
