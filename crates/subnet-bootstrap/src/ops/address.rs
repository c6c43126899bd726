use crate::ids::{AccountId, CodeHandle, DeployedAddress, Salt};
use sha2::{Digest, Sha256};

const CREATE2_PREFIX: u8 = 0xff;

/// Deterministic instance address:
/// `SHA-256(0xff ‖ deployer ‖ salt ‖ SHA-256(code_hash ‖ input))[12..]`.
///
/// `input` is the encoded constructor call (selector then arguments).
#[must_use]
pub fn derive_address(
    deployer: &AccountId,
    code_hash: &CodeHandle,
    input: &[u8],
    salt: &Salt,
) -> DeployedAddress {
    let init_hash = Sha256::new()
        .chain_update(code_hash.as_bytes())
        .chain_update(input)
        .finalize();

    let digest = Sha256::new()
        .chain_update([CREATE2_PREFIX])
        .chain_update(deployer.as_bytes())
        .chain_update(salt.as_bytes())
        .chain_update(init_hash)
        .finalize();

    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);

    DeployedAddress::new(out)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> (AccountId, CodeHandle, Vec<u8>, Salt) {
        (
            AccountId::new([1; 32]),
            CodeHandle::of(b"subnet"),
            b"new".to_vec(),
            Salt::new([2; 32]),
        )
    }

    #[test]
    fn identical_inputs_give_identical_address() {
        let (deployer, code, input, salt) = inputs();

        assert_eq!(
            derive_address(&deployer, &code, &input, &salt),
            derive_address(&deployer, &code, &input, &salt)
        );
    }

    #[test]
    fn every_input_affects_the_address() {
        let (deployer, code, input, salt) = inputs();
        let base = derive_address(&deployer, &code, &input, &salt);

        assert_ne!(base, derive_address(&AccountId::new([9; 32]), &code, &input, &salt));
        assert_ne!(base, derive_address(&deployer, &CodeHandle::of(b"cloud"), &input, &salt));
        assert_ne!(base, derive_address(&deployer, &code, b"new\x01", &salt));
        assert_ne!(base, derive_address(&deployer, &code, &input, &Salt::new([3; 32])));
    }

    #[test]
    fn address_matches_manual_digest() {
        let (deployer, code, input, salt) = inputs();

        let mut init = Vec::new();
        init.extend_from_slice(code.as_bytes());
        init.extend_from_slice(&input);
        let init_hash = Sha256::digest(&init);

        let mut outer = vec![0xff];
        outer.extend_from_slice(deployer.as_bytes());
        outer.extend_from_slice(salt.as_bytes());
        outer.extend_from_slice(&init_hash);
        let digest = Sha256::digest(&outer);

        assert_eq!(
            derive_address(&deployer, &code, &input, &salt).as_bytes()[..],
            digest[12..]
        );
    }
}
