//! Public entry points.
//!
//! Each function here can be run on its own against a connected
//! [`Session`]: full network deployment, worker-only initialization, code
//! upgrades, account mapping and disk management. They translate config
//! into workflow or ops calls; no sequencing logic lives here.

pub mod account;
pub mod disk;
pub mod network;
pub mod session;
pub mod upgrade;

pub use account::ensure_account_mapping;
pub use disk::DiskApi;
pub use network::{deploy_network, deploy_network_with, init_workers};
pub use session::Session;
pub use upgrade::{upgrade_cloud, upgrade_contract, upgrade_subnet};
