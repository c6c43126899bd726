//!
//! Fixed-width identifiers shared by every layer: native accounts, contract
//! addresses, content-addressed code handles and deployment salts.
//!
//! All of them print as `0x`-prefixed lowercase hex, parse from hex with or
//! without the prefix, encode as a candid `blob`, and serialize as a hex
//! string in human-readable formats (TOML, JSON).
//!

mod account;
mod address;
mod code;
mod contract;
mod salt;

pub use account::AccountId;
pub use address::DeployedAddress;
pub use code::CodeHandle;
pub use contract::ContractKind;
pub use salt::Salt;

use thiserror::Error as ThisError;

/// Slot index of a validator or worker inside the Subnet contract.
pub type NodeId = u64;

///
/// IdError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum IdError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("expected {expected} bytes, found {found}")]
    InvalidLength { expected: usize, found: usize },
}

/// Decode `0x`-prefixed (or bare) hex into exactly `N` bytes.
pub(crate) fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], IdError> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(raw).map_err(|e| IdError::InvalidHex(e.to_string()))?;
    let found = bytes.len();

    bytes
        .try_into()
        .map_err(|_| IdError::InvalidLength { expected: N, found })
}

///
/// impl_fixed_bytes
///
/// Shared trait surface for the `[u8; N]` newtypes in this module.
///

macro_rules! impl_fixed_bytes {
    ($ty:ident, $len:expr) => {
        impl $ty {
            pub const LEN: usize = $len;

            #[must_use]
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            #[must_use]
            pub fn to_hex(&self) -> String {
                format!("0x{}", ::hex::encode(self.0))
            }

            /// Build from a slice, rejecting any other width.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, $crate::ids::IdError> {
                let arr: [u8; $len] =
                    bytes
                        .try_into()
                        .map_err(|_| $crate::ids::IdError::InvalidLength {
                            expected: $len,
                            found: bytes.len(),
                        })?;

                Ok(Self(arr))
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl ::std::fmt::Debug for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}({})", stringify!($ty), self.to_hex())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::ids::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $crate::ids::decode_fixed::<$len>(s).map(Self)
            }
        }

        impl AsRef<[u8]> for $ty {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $ty {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl ::candid::CandidType for $ty {
            fn _ty() -> ::candid::types::Type {
                <Vec<u8> as ::candid::CandidType>::ty()
            }

            fn idl_serialize<S>(&self, serializer: S) -> Result<(), S::Error>
            where
                S: ::candid::types::Serializer,
            {
                serializer.serialize_blob(&self.0)
            }
        }

        impl ::serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_hex())
                } else {
                    serializer.serialize_bytes(&self.0)
                }
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                struct FixedVisitor;

                impl<'de> ::serde::de::Visitor<'de> for FixedVisitor {
                    type Value = $ty;

                    fn expecting(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                        write!(f, "{} bytes or a hex string", $len)
                    }

                    fn visit_str<E: ::serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                        v.parse().map_err(E::custom)
                    }

                    fn visit_bytes<E: ::serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                        $ty::from_slice(v).map_err(E::custom)
                    }

                    fn visit_byte_buf<E: ::serde::de::Error>(
                        self,
                        v: Vec<u8>,
                    ) -> Result<Self::Value, E> {
                        self.visit_bytes(&v)
                    }

                    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
                    where
                        A: ::serde::de::SeqAccess<'de>,
                    {
                        let mut bytes = Vec::with_capacity($len);
                        while let Some(b) = seq.next_element::<u8>()? {
                            bytes.push(b);
                        }

                        $ty::from_slice(&bytes).map_err(::serde::de::Error::custom)
                    }
                }

                if deserializer.is_human_readable() {
                    deserializer.deserialize_str(FixedVisitor)
                } else {
                    deserializer.deserialize_bytes(FixedVisitor)
                }
            }
        }
    };
}

pub(crate) use impl_fixed_bytes;

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_fixed_accepts_prefixed_and_bare_hex() {
        let a: [u8; 2] = decode_fixed("0xabcd").expect("prefixed");
        let b: [u8; 2] = decode_fixed("abcd").expect("bare");

        assert_eq!(a, [0xab, 0xcd]);
        assert_eq!(a, b);
    }

    #[test]
    fn decode_fixed_rejects_wrong_width() {
        let err = decode_fixed::<4>("0xabcd").unwrap_err();

        assert_eq!(
            err,
            IdError::InvalidLength {
                expected: 4,
                found: 2
            }
        );
    }

    #[test]
    fn decode_fixed_rejects_non_hex() {
        assert!(matches!(
            decode_fixed::<2>("0xzz11"),
            Err(IdError::InvalidHex(_))
        ));
    }

    #[test]
    fn candid_blob_round_trip_for_address() {
        let addr = DeployedAddress::new([7; 20]);
        let bytes = candid::encode_one(addr).expect("encode");
        let back: DeployedAddress = candid::decode_one(&bytes).expect("decode");

        assert_eq!(addr, back);
    }

    #[test]
    fn candid_decodes_ids_inside_argument_tuples() {
        let addr = DeployedAddress::new([3; 20]);
        let account = AccountId::new([9; 32]);
        let code = CodeHandle::new([5; 32]);

        let bytes = candid::encode_args((addr, account, code)).expect("encode");
        let back: (DeployedAddress, AccountId, CodeHandle) =
            candid::decode_args(&bytes).expect("decode");

        assert_eq!(back, (addr, account, code));
    }

    #[test]
    fn ids_serialize_as_hex_in_json() {
        let code = CodeHandle::new([0xab; 32]);
        let json = serde_json::to_string(&code).expect("json");

        assert_eq!(json, format!("\"0x{}\"", "ab".repeat(32)));
        assert_eq!(serde_json::from_str::<CodeHandle>(&json).expect("parse"), code);
    }
}
