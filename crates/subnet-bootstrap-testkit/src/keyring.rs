use sha2::{Digest, Sha256};
use subnet_bootstrap::{
    ids::{AccountId, IdError, Salt},
    infra::{ChainError, Keyring, Signer},
};

///
/// DevKeyring
///
/// Derives accounts from dev URIs (`//Alice`) or `0x` hex secrets. The
/// account is a hash of the seed; no real key pair is produced.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DevKeyring;

impl Keyring for DevKeyring {
    fn pair_from_seed(&self, seed: &str, network_id: u16) -> Result<Signer, ChainError> {
        let secret: Vec<u8> = if let Some(name) = seed.strip_prefix("//") {
            if name.is_empty() {
                return Err(ChainError::InvalidSeed("empty dev uri".to_string()));
            }
            seed.as_bytes().to_vec()
        } else if seed.starts_with("0x") {
            // raw 32-byte secret; reuses the fixed-width hex parser
            let secret: Salt = seed
                .parse()
                .map_err(|e: IdError| ChainError::InvalidSeed(e.to_string()))?;
            secret.as_bytes().to_vec()
        } else {
            return Err(ChainError::InvalidSeed(format!(
                "expected //name or 0x-prefixed secret, got '{seed}'"
            )));
        };

        let account = AccountId::new(Sha256::digest(&secret).into());

        Ok(Signer::new(account, network_id))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_uris_map_to_stable_accounts() {
        let a = DevKeyring.pair_from_seed("//Alice", 42).expect("alice");
        let b = DevKeyring.pair_from_seed("//Alice", 42).expect("alice again");
        let bob = DevKeyring.pair_from_seed("//Bob", 42).expect("bob");

        assert_eq!(a, b);
        assert_ne!(a.account, bob.account);
        assert_eq!(a.network_id, 42);
    }

    #[test]
    fn malformed_seeds_are_rejected() {
        for seed in ["", "//", "alice", "0x1234"] {
            assert!(
                matches!(
                    DevKeyring.pair_from_seed(seed, 42),
                    Err(ChainError::InvalidSeed(_))
                ),
                "seed {seed:?} should be rejected"
            );
        }
    }

    #[test]
    fn hex_secrets_are_accepted() {
        let seed = format!("0x{}", "11".repeat(32));

        assert!(DevKeyring.pair_from_seed(&seed, 0).is_ok());
    }
}
