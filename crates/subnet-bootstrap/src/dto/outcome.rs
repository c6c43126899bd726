use crate::{dto::prelude::*, ids::NodeId};

///
/// DeployOutcome
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum DeployOutcome {
    Deployed(DeployedAddress),
    AlreadyDeployed(DeployedAddress),
    Rejected(String),
}

impl DeployOutcome {
    /// The contract address, when one exists at the derived location.
    #[must_use]
    pub const fn address(&self) -> Option<DeployedAddress> {
        match self {
            Self::Deployed(addr) | Self::AlreadyDeployed(addr) => Some(*addr),
            Self::Rejected(_) => None,
        }
    }

    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Deployed(_))
    }
}

///
/// RegisterOutcome
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum RegisterOutcome {
    Registered(NodeId),
    /// A record already sits at the slot the run expected to create.
    SlotOccupied(NodeId),
    Rejected(String),
}

impl RegisterOutcome {
    #[must_use]
    pub const fn slot(&self) -> Option<NodeId> {
        match self {
            Self::Registered(id) | Self::SlotOccupied(id) => Some(*id),
            Self::Rejected(_) => None,
        }
    }
}

///
/// MappingOutcome
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum MappingOutcome {
    AlreadyMapped,
    Mapped,
}

///
/// UpgradeOutcome
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
pub enum UpgradeOutcome {
    AlreadyCurrent,
    Upgraded,
}
