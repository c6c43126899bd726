//!
//! Chain seam.
//!
//! Transport, signing and key material live outside this crate. The core
//! only consumes the traits declared here; `subnet-bootstrap-testkit` ships
//! an in-memory implementation.
//!

pub mod chain;
pub mod signer;

pub use chain::{
    CallData, CallRequest, CallResult, ChainClient, ChainConnector, ContractInfo, DryRun,
    ExecReceipt, GasEstimate, InstantiateRequest, InstantiateResult, RuntimeCall, SubmitOptions,
};
pub use signer::{Keyring, Signer};

use crate::ErrorClass;
use thiserror::Error as ThisError;

///
/// ChainError
///
/// Raised by chain seam implementations. `Unavailable` is a transport
/// failure; everything else is a verdict from the chain itself.
///

#[derive(Debug, ThisError)]
pub enum ChainError {
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("contract reverted (0x{})", hex::encode(.0))]
    Reverted(Vec<u8>),

    #[error("chain unavailable: {0}")]
    Unavailable(String),
}

impl ChainError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidSeed(_) => ErrorClass::Config,
            Self::Rejected(_) | Self::Reverted(_) => ErrorClass::Rejection,
            Self::Unavailable(_) => ErrorClass::Transport,
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
    fn reverted_payload_is_rendered_as_hex() {
        let err = ChainError::Reverted(vec![0x01, 0xff]);

        assert_eq!(err.to_string(), "contract reverted (0x01ff)");
        assert_eq!(err.class(), ErrorClass::Rejection);
    }
}
