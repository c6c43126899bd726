//!
//! Typed revert payloads.
//!
//! Contracts revert with a candid-encoded error enum. Decoding is keyed by
//! the contract kind; anything that does not decode is kept as raw hex.
//!

use crate::{dto::prelude::*, ids::ContractKind};
use std::fmt::{self, Display};

///
/// SubnetError
///

#[derive(CandidType, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum SubnetError {
    EpochNotExpired,
    InvalidSideChainCaller,
    InvalidSideChainSignature,
    MustCallByGovContract,
    MustCallByMainContract,
    NodeIsRunning,
    NodeNotExist,
    NotEnoughBalance,
    RegionNotExist,
    SecretNodeAlreadyExists,
    SetCodeFailed,
    TransferFailed,
    WorkerAlreadyExists,
    WorkerIsUseByUser,
    WorkerMortgageNotExist,
    WorkerNotExist,
    WorkerNotOwnedByCaller,
    WorkerStatusNotReady,
}

///
/// CloudError
///

#[derive(CandidType, Clone, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum CloudError {
    DelFailed,
    InvalidSubnetAddress,
    MustCallByGovContract,
    NotFound,
    SetCodeFailed,
}

///
/// Revert
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Revert {
    Cloud(CloudError),
    Raw(String),
    Subnet(SubnetError),
}

impl Revert {
    /// Decode a revert payload emitted by a contract of `kind`.
    #[must_use]
    pub fn decode(kind: ContractKind, data: &[u8]) -> Self {
        let decoded = match kind {
            ContractKind::Subnet => candid::decode_one::<SubnetError>(data).ok().map(Self::Subnet),
            ContractKind::Cloud => candid::decode_one::<CloudError>(data).ok().map(Self::Cloud),
            ContractKind::Pod => None,
        };

        decoded.unwrap_or_else(|| Self::Raw(format!("0x{}", hex::encode(data))))
    }

    #[must_use]
    pub const fn subnet(&self) -> Option<&SubnetError> {
        match self {
            Self::Subnet(err) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub const fn cloud(&self) -> Option<&CloudError> {
        match self {
            Self::Cloud(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for Revert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cloud(err) => write!(f, "{err}"),
            Self::Raw(data) => write!(f, "revert {data}"),
            Self::Subnet(err) => write!(f, "{err}"),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_by_contract_kind() {
        let data = candid::encode_one(SubnetError::NodeNotExist).expect("encode");

        assert_eq!(
            Revert::decode(ContractKind::Subnet, &data),
            Revert::Subnet(SubnetError::NodeNotExist)
        );
        assert!(matches!(
            Revert::decode(ContractKind::Cloud, &data),
            Revert::Raw(_)
        ));
    }

    #[test]
    fn undecodable_payload_is_raw_hex() {
        let revert = Revert::decode(ContractKind::Subnet, &[0xde, 0xad]);

        assert_eq!(revert, Revert::Raw("0xdead".into()));
        assert_eq!(revert.to_string(), "revert 0xdead");
    }
}
