use crate::dto::prelude::*;

///
/// MortgageTerms
///
/// Resource quantities and collateral a worker owner commits in one
/// `worker_mortgage` call.
///

#[derive(CandidType, Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MortgageTerms {
    pub cpu: u32,
    pub mem: u32,
    pub cvm_cpu: u32,
    pub cvm_mem: u32,
    pub disk: u32,
    pub gpu: u32,
    pub deposit: u128,
}

///
/// MortgageRecord
///
/// A committed mortgage as stored by the Subnet; `deleted` is the block at
/// which it was released.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MortgageRecord {
    pub cpu: u32,
    pub cvm_cpu: u32,
    pub mem: u32,
    pub cvm_mem: u32,
    pub disk: u32,
    pub gpu: u32,
    pub amount: u128,
    pub deleted: Option<u64>,
}

impl MortgageRecord {
    #[must_use]
    pub const fn from_terms(terms: &MortgageTerms) -> Self {
        Self {
            cpu: terms.cpu,
            cvm_cpu: terms.cvm_cpu,
            mem: terms.mem,
            cvm_mem: terms.cvm_mem,
            disk: terms.disk,
            gpu: terms.gpu,
            amount: terms.deposit,
            deleted: None,
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.deleted.is_none()
    }
}
