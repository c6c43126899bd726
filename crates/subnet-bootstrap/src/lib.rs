//! Host-side bootstrap library for a compute subnet.
//!
//! Drives a chain client to upload contract code, deploy the Subnet and Cloud
//! contracts at salt-derived addresses, register validators and workers, and
//! keep already-confirmed state intact across upgrades and retries.
//!
//! ## Layering
//!
//! - `ids/` owns the fixed-width identifiers (accounts, addresses, code hashes, salts).
//! - `dto/` holds the candid records exchanged with the contracts.
//! - `infra/` declares the chain seam (transport, signing, keyring) consumed by the core.
//! - `ops/` provides mechanical, reusable side-effecting operations.
//! - `workflow/` implements the bootstrap state machine.
//! - `api/` exposes the entry points callers run independently.
//!
//! The default flow is: api → workflow → ops → infra.

pub mod api;
pub mod config;
pub mod dto;
pub mod error;
pub mod ids;
pub mod infra;
pub mod log;
pub mod ops;
pub mod workflow;

pub use error::{Error, ErrorClass};

///
/// Crate Version
///

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error, ErrorClass,
        dto::{
            disk::Disk,
            endpoint::{Endpoint, Ip},
            mortgage::MortgageTerms,
            outcome::{DeployOutcome, MappingOutcome, RegisterOutcome, UpgradeOutcome},
        },
        ids::{AccountId, CodeHandle, ContractKind, DeployedAddress, NodeId, Salt},
        infra::{ChainClient, ChainConnector, Keyring, Signer},
        log,
        log::Topic,
    };
}
