use crate::ids::AccountId;
use sha2::{Digest, Sha256};

///
/// DeployedAddress
///
/// 20-byte address of a contract instance, or the fixed-width form of a
/// native account. The durable key for every contract interaction.
///

#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DeployedAddress(pub [u8; 20]);

super::impl_fixed_bytes!(DeployedAddress, 20);

impl DeployedAddress {
    /// Fixed-width form of a native account: the low 20 bytes of its SHA-256.
    #[must_use]
    pub fn from_account(account: &AccountId) -> Self {
        let digest = Sha256::digest(account.as_bytes());
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest[12..]);

        Self(out)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_mapping_is_deterministic() {
        let account = AccountId::new([9; 32]);

        assert_eq!(
            DeployedAddress::from_account(&account),
            DeployedAddress::from_account(&account)
        );
        assert_ne!(
            DeployedAddress::from_account(&account),
            DeployedAddress::from_account(&AccountId::new([8; 32]))
        );
    }

    #[test]
    fn zero_address_is_detected() {
        assert!(DeployedAddress::default().is_zero());
        assert!(!DeployedAddress::new([1; 20]).is_zero());
    }
}
