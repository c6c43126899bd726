use crate::{
    ids::{AccountId, DeployedAddress},
    infra::ChainError,
};
use std::fmt::{self, Display};

///
/// Signer
///
/// Identity a transaction is signed for. Key material stays with the
/// keyring that issued it.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Signer {
    pub account: AccountId,
    pub network_id: u16,
}

impl Signer {
    #[must_use]
    pub const fn new(account: AccountId, network_id: u16) -> Self {
        Self {
            account,
            network_id,
        }
    }

    /// Fixed-width form used as caller/owner inside contracts.
    #[must_use]
    pub fn address(&self) -> DeployedAddress {
        DeployedAddress::from_account(&self.account)
    }
}

impl Display for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.account, self.network_id)
    }
}

///
/// Keyring
///

pub trait Keyring: Send + Sync {
    /// Derive a signer from a seed phrase or dev URI such as `//Alice`.
    fn pair_from_seed(&self, seed: &str, network_id: u16) -> Result<Signer, ChainError>;
}
