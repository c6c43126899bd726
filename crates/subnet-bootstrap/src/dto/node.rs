use crate::dto::{endpoint::Ip, prelude::*};

///
/// ValidatorRecord
///
/// A secret-sharing validator registered in the Subnet. Its slot index is
/// assigned in registration order starting at 0.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ValidatorRecord {
    pub name: Vec<u8>,
    pub owner: DeployedAddress,
    pub validator_id: AccountId,
    pub p2p_id: AccountId,
    pub ip: Ip,
    pub port: u32,
    pub start_block: u64,
    pub terminal_block: Option<u64>,
    pub status: u8,
}

impl ValidatorRecord {
    #[must_use]
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

///
/// WorkerRecord
///
/// A compute cluster offering capacity in a region.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WorkerRecord {
    pub name: Vec<u8>,
    pub owner: DeployedAddress,
    pub p2p_id: AccountId,
    pub ip: Ip,
    pub port: u32,
    pub level: u8,
    pub region_id: u32,
    pub start_block: u64,
    pub stop_block: Option<u64>,
    pub terminal_block: Option<u64>,
    pub status: u8,
}

impl WorkerRecord {
    /// Workers accept new mortgages only while offline (status 0).
    #[must_use]
    pub const fn is_offline(&self) -> bool {
        self.status == 0
    }
}
