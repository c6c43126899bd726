//! Ops layer: mechanical, reusable side effects against the chain seam.
//!
//! Ops never decide *when* something happens; the bootstrap workflow and the
//! public API sequence them.

pub mod account;
pub mod address;
pub mod artifact;
pub mod contract;
pub mod deploy;
pub mod sequence;
pub mod upgrade;

pub use address::derive_address;
