use crate::{
    Error,
    dto::outcome::{DeployOutcome, RegisterOutcome},
    ids::{CodeHandle, DeployedAddress, NodeId},
    workflow::bootstrap::BootstrapState,
};
use serde::Serialize;

///
/// BootstrapReport
///
/// What a run did, step by step. Addresses render as hex in JSON.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct BootstrapReport {
    pub state: BootstrapState,
    pub pod_code: Option<CodeHandle>,
    pub subnet: Option<DeployOutcome>,
    pub cloud: Option<DeployOutcome>,
    pub validators: Vec<RegisterOutcome>,
    pub boot_nodes: Vec<NodeId>,
    pub joined: Vec<NodeId>,
    pub region: Option<String>,
    pub workers: Vec<RegisterOutcome>,
    /// `(worker id, mortgage id)` pairs.
    pub mortgages: Vec<(NodeId, u32)>,
}

impl BootstrapReport {
    #[must_use]
    pub fn subnet_address(&self) -> Option<DeployedAddress> {
        self.subnet.as_ref().and_then(DeployOutcome::address)
    }

    #[must_use]
    pub fn cloud_address(&self) -> Option<DeployedAddress> {
        self.cloud.as_ref().and_then(DeployOutcome::address)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Codec(e.to_string()))
    }
}

///
/// TESTS
///
