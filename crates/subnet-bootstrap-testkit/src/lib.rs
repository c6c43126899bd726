//! Test utilities for exercising the subnet bootstrap without a node.
//!
//! [`SimChain`] is an in-memory chain implementing the bootstrap crate's
//! chain seam, with Subnet, Cloud and Pod contract semantics. [`Fake`]
//! derives stable identifiers from numeric seeds and `fixtures` rebuilds the
//! reference deployment (three validators, one worker).

pub mod artifact;
pub mod chain;
mod contracts;
pub mod fixtures;
pub mod keyring;

pub use chain::SimChain;
pub use keyring::DevKeyring;

use sha2::{Digest, Sha256};
use subnet_bootstrap::ids::{AccountId, DeployedAddress, Salt};

///
/// Deterministic dummy-value generator for tests.
///
/// Produces stable accounts, addresses and salts derived from a numeric
/// seed, which makes tests reproducible without hardcoding raw byte arrays.
///

pub struct Fake;

impl Fake {
    #[must_use]
    pub fn account(seed: u32) -> AccountId {
        AccountId::new(Self::bytes(b"account", seed))
    }

    /// Fixed-width form of [`Fake::account`].
    #[must_use]
    pub fn address(seed: u32) -> DeployedAddress {
        DeployedAddress::from_account(&Self::account(seed))
    }

    #[must_use]
    pub fn salt(seed: u32) -> Salt {
        Salt::new(Self::bytes(b"salt", seed))
    }

    fn bytes(domain: &[u8], seed: u32) -> [u8; 32] {
        Sha256::new()
            .chain_update(domain)
            .chain_update(seed.to_be_bytes())
            .finalize()
            .into()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_account_is_deterministic_and_unique() {
        let a1 = Fake::account(42);
        let a2 = Fake::account(42);
        let b = Fake::account(99);

        assert_eq!(a1, a2, "Fake::account should be deterministic");
        assert_ne!(a1, b, "Fake::account should vary by seed");
    }

    #[test]
    fn fake_salt_differs_from_fake_account() {
        assert_ne!(Fake::salt(1).as_bytes(), Fake::account(1).as_bytes());
        assert_eq!(Fake::address(3), DeployedAddress::from_account(&Fake::account(3)));
    }
}
