use crate::dto::prelude::*;

///
/// Disk
///
/// Encrypted storage volume owned by a user of the Cloud contract.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Disk {
    /// `key` names the disk, `secret_hash` is set by the side chain once the
    /// encryption key exists, `size` is in GB.
    SecretSsd {
        key: Vec<u8>,
        secret_hash: Vec<u8>,
        size: u32,
    },
}

impl Disk {
    #[must_use]
    pub const fn new(key: Vec<u8>, size: u32) -> Self {
        Self::SecretSsd {
            key,
            secret_hash: Vec::new(),
            size,
        }
    }

    #[must_use]
    pub const fn size(&self) -> u32 {
        match self {
            Self::SecretSsd { size, .. } => *size,
        }
    }

    #[must_use]
    pub fn key(&self) -> &[u8] {
        match self {
            Self::SecretSsd { key, .. } => key,
        }
    }
}

///
/// DiskRecord
/// A disk together with its owner and per-owner index.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DiskRecord {
    pub owner: DeployedAddress,
    pub id: u64,
    pub disk: Disk,
}
