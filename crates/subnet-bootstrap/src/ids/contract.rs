use candid::CandidType;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// ContractKind
///
/// The contracts that make up a subnet deployment.
///

#[derive(
    CandidType, Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize,
)]
#[remain::sorted]
pub enum ContractKind {
    Cloud,
    Pod,
    Subnet,
}
