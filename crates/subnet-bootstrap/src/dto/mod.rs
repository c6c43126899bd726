//!
//! Candid records exchanged with the Subnet and Cloud contracts, plus the
//! typed outcomes returned by the ops layer.
//!

pub mod disk;
pub mod endpoint;
pub mod mortgage;
pub mod node;
pub mod outcome;
pub mod page;
pub mod revert;

///
/// PRELUDE
///

pub mod prelude {
    pub use crate::ids::{AccountId, CodeHandle, DeployedAddress, NodeId};
    pub use candid::CandidType;
    pub use derive_more::Display;
    pub use serde::{Deserialize, Serialize};
}
