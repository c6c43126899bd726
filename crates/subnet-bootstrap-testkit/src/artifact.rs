//!
//! Simulated code blobs.
//!
//! A blob is `SIMVM` ‖ kind tag ‖ version (LE u32) ‖ filler. The kind decides
//! which contract the simulated chain runs; the version only changes the
//! bytes, and so the code hash.
//!

use subnet_bootstrap::ids::ContractKind;

pub const MAGIC: &[u8; 5] = b"SIMVM";

const FILLER_LEN: usize = 64;

/// Build a loadable blob for `kind` at `version`.
#[must_use]
pub fn code(kind: ContractKind, version: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAGIC.len() + 5 + FILLER_LEN);
    out.extend_from_slice(MAGIC);
    out.push(tag(kind));
    out.extend_from_slice(&version.to_le_bytes());
    out.resize(out.len() + FILLER_LEN, tag(kind));

    out
}

/// Decode a blob header.
#[must_use]
pub fn parse(bytes: &[u8]) -> Option<(ContractKind, u32)> {
    let rest = bytes.strip_prefix(MAGIC.as_slice())?;
    let (&tag, rest) = rest.split_first()?;
    let version = u32::from_le_bytes(rest.get(..4)?.try_into().ok()?);

    let kind = match tag {
        b'C' => ContractKind::Cloud,
        b'P' => ContractKind::Pod,
        b'S' => ContractKind::Subnet,
        _ => return None,
    };

    Some((kind, version))
}

const fn tag(kind: ContractKind) -> u8 {
    match kind {
        ContractKind::Cloud => b'C',
        ContractKind::Pod => b'P',
        ContractKind::Subnet => b'S',
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let blob = code(ContractKind::Cloud, 7);

        assert_eq!(parse(&blob), Some((ContractKind::Cloud, 7)));
    }

    #[test]
    fn versions_change_the_bytes() {
        assert_ne!(code(ContractKind::Subnet, 1), code(ContractKind::Subnet, 2));
    }

    #[test]
    fn foreign_bytes_do_not_parse() {
        assert_eq!(parse(b"\0asm\x01\0\0\0"), None);
        assert_eq!(parse(b"SIMVMX\x01\0\0\0"), None);
    }
}
