///
/// AccountId
///
/// 32-byte native account identifier (public key form). Parsed from hex;
/// the chain's own address encodings are the transport's concern.
///

#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AccountId(pub [u8; 32]);

super::impl_fixed_bytes!(AccountId, 32);

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_display_round_trips_through_from_str() {
        let id = AccountId::new([0x5c; 32]);
        let parsed: AccountId = id.to_string().parse().expect("parse");

        assert_eq!(id, parsed);
        assert!(id.to_string().starts_with("0x5c5c"));
    }

    #[test]
    fn from_slice_rejects_short_input() {
        assert!(AccountId::from_slice(&[1, 2, 3]).is_err());
    }
}
