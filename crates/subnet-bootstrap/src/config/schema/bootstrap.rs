use super::{ConfigSchemaError, EndpointConfig, Validate, validate_name};
use crate::ids::{AccountId, NodeId, Salt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

///
/// BootstrapConfig
///
/// Validators are registered in list order, so list position is the slot
/// the Subnet assigns. `boot_nodes` and `joins` refer to those slots.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Treat an already-registered identity at its expected slot as done.
    #[serde(default)]
    pub skip_occupied: bool,

    /// Fixed deployment salts; a rerun with the same salts finds the
    /// instances it created before. Unset salts are drawn at random.
    #[serde(default)]
    pub subnet_salt: Option<Salt>,

    #[serde(default)]
    pub cloud_salt: Option<Salt>,

    #[serde(default)]
    pub boot_nodes: Vec<NodeId>,

    #[serde(default)]
    pub joins: Vec<NodeId>,

    #[serde(default)]
    pub validators: Vec<ValidatorConfig>,
}

impl Validate for BootstrapConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        let mut p2p_ids = BTreeSet::new();
        for validator in &self.validators {
            validator.validate()?;

            if !p2p_ids.insert(validator.p2p_id) {
                return Err(ConfigSchemaError::ValidationError(format!(
                    "validator '{}' reuses p2p_id {}",
                    validator.name, validator.p2p_id
                )));
            }
        }

        let count = self.validators.len() as u64;
        for (field, slots) in [("boot_nodes", &self.boot_nodes), ("joins", &self.joins)] {
            if let Some(slot) = slots.iter().find(|slot| **slot >= count) {
                return Err(ConfigSchemaError::ValidationError(format!(
                    "bootstrap.{field} references slot {slot} but only {count} validators are configured"
                )));
            }
        }

        Ok(())
    }
}

///
/// ValidatorConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ValidatorConfig {
    pub name: String,
    pub validator_id: AccountId,
    pub p2p_id: AccountId,
    pub endpoint: EndpointConfig,
}

impl Validate for ValidatorConfig {
    fn validate(&self) -> Result<(), ConfigSchemaError> {
        validate_name(&self.name, "validator")?;
        self.endpoint.validate()
    }
}

///
/// TESTS
///
