use crate::{
    config::{
        ConfigModel,
        schema::{ArtifactsConfig, ValidatorConfig, WorkerConfig},
    },
    dto::{endpoint::Endpoint, mortgage::MortgageTerms},
    ids::{AccountId, NodeId, Salt},
    ops::artifact::{ArtifactError, read_artifact},
};

///
/// ValidatorPlan
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidatorPlan {
    pub name: String,
    pub validator_id: AccountId,
    pub p2p_id: AccountId,
    pub endpoint: Endpoint,
}

impl From<&ValidatorConfig> for ValidatorPlan {
    fn from(cfg: &ValidatorConfig) -> Self {
        Self {
            name: cfg.name.clone(),
            validator_id: cfg.validator_id,
            p2p_id: cfg.p2p_id,
            endpoint: cfg.endpoint.to_endpoint(),
        }
    }
}

///
/// WorkerPlan
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WorkerPlan {
    pub name: String,
    pub p2p_id: AccountId,
    pub endpoint: Endpoint,
    pub level: u8,
    pub region_id: u32,
    pub mortgages: Vec<MortgageTerms>,
}

impl From<&WorkerConfig> for WorkerPlan {
    fn from(cfg: &WorkerConfig) -> Self {
        Self {
            name: cfg.name.clone(),
            p2p_id: cfg.p2p_id,
            endpoint: cfg.endpoint.to_endpoint(),
            level: cfg.level,
            region_id: cfg.region_id,
            mortgages: cfg.mortgages.iter().map(|m| m.to_terms()).collect(),
        }
    }
}

///
/// BootstrapPlan
///
/// Everything a run registers, in registration order.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BootstrapPlan {
    pub skip_occupied: bool,
    pub subnet_salt: Option<Salt>,
    pub cloud_salt: Option<Salt>,
    pub validators: Vec<ValidatorPlan>,
    pub boot_nodes: Vec<NodeId>,
    pub joins: Vec<NodeId>,
    pub region: Option<String>,
    pub workers: Vec<WorkerPlan>,
}

impl BootstrapPlan {
    #[must_use]
    pub fn from_config(cfg: &ConfigModel) -> Self {
        let bootstrap = &cfg.bootstrap;

        Self {
            skip_occupied: bootstrap.skip_occupied,
            subnet_salt: bootstrap.subnet_salt,
            cloud_salt: bootstrap.cloud_salt,
            validators: bootstrap.validators.iter().map(ValidatorPlan::from).collect(),
            boot_nodes: bootstrap.boot_nodes.clone(),
            joins: bootstrap.joins.clone(),
            region: cfg.workers.as_ref().map(|w| w.region.clone()),
            workers: cfg
                .workers
                .iter()
                .flat_map(|w| w.nodes.iter().map(WorkerPlan::from))
                .collect(),
        }
    }
}

///
/// NetworkArtifacts
/// Compiled blobs for a full deployment.
///

#[derive(Clone, Debug)]
pub struct NetworkArtifacts {
    pub pod: Vec<u8>,
    pub subnet: Vec<u8>,
    pub cloud: Vec<u8>,
}

impl NetworkArtifacts {
    pub fn load(cfg: &ArtifactsConfig) -> Result<Self, ArtifactError> {
        Ok(Self {
            pod: read_artifact(&cfg.pod)?,
            subnet: read_artifact(&cfg.subnet)?,
            cloud: read_artifact(&cfg.cloud)?,
        })
    }
}

///
/// TESTS
///
