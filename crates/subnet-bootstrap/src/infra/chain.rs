use crate::{
    ids::{AccountId, CodeHandle, DeployedAddress, Salt},
    infra::{ChainError, Signer},
};
use async_trait::async_trait;
use candid::utils::ArgumentEncoder;
use serde::Serialize;
use std::sync::Arc;

///
/// CallData
///
/// Opaque call payload: a method selector and candid-encoded arguments. The
/// transport never looks inside `args`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallData {
    pub method: String,
    pub args: Vec<u8>,
}

impl CallData {
    pub fn encode<A: ArgumentEncoder>(method: &str, args: A) -> Result<Self, candid::Error> {
        Ok(Self {
            method: method.to_string(),
            args: candid::encode_args(args)?,
        })
    }

    /// Selector bytes followed by the argument bytes, as hashed into
    /// deployment addresses.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.method.len() + self.args.len());
        out.extend_from_slice(self.method.as_bytes());
        out.extend_from_slice(&self.args);

        out
    }
}

///
/// GasEstimate
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct GasEstimate {
    pub ref_time: u64,
    pub proof_size: u64,
}

///
/// CallRequest
///

#[derive(Clone, Debug)]
pub struct CallRequest {
    pub origin: AccountId,
    pub dest: DeployedAddress,
    pub data: CallData,
    pub value: u128,
    pub gas_limit: Option<GasEstimate>,
}

///
/// CallResult
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CallResult {
    Returned(Vec<u8>),
    Reverted(Vec<u8>),
}

///
/// DryRun
/// Simulated execution against finalized state.
///

#[derive(Clone, Debug)]
pub struct DryRun {
    pub result: CallResult,
    pub gas: GasEstimate,
}

///
/// SubmitOptions
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SubmitOptions {
    /// Explicit account nonce; `None` lets the transport pick the next one.
    pub nonce: Option<u64>,
    pub wait_finality: bool,
}

///
/// ExecReceipt
///
/// `block` and `output` are only known once the transaction is finalized;
/// fire-and-forget submissions return neither.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExecReceipt {
    pub nonce: u64,
    pub block: Option<u64>,
    pub output: Option<Vec<u8>>,
}

impl ExecReceipt {
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.block.is_some()
    }
}

///
/// InstantiateRequest
///

#[derive(Clone, Debug)]
pub struct InstantiateRequest {
    pub code_hash: CodeHandle,
    pub ctor: CallData,
    pub salt: Salt,
    pub value: u128,
}

///
/// InstantiateResult
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InstantiateResult {
    pub address: DeployedAddress,
    pub block: u64,
}

///
/// ContractInfo
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContractInfo {
    pub code_hash: CodeHandle,
    pub deployer: AccountId,
}

///
/// RuntimeCall
/// Calls into chain runtime modules rather than a contract.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RuntimeCall {
    /// Register the signer's fixed-width address so contracts can resolve
    /// it back to the native account.
    MapAccount,
}

///
/// ChainClient
///

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Store a code blob. Identical bytes yield the identical handle.
    async fn upload_code(&self, signer: &Signer, code: Vec<u8>) -> Result<CodeHandle, ChainError>;

    /// Finalized contract metadata, `None` when nothing lives at `address`.
    async fn contract_info(
        &self,
        address: &DeployedAddress,
    ) -> Result<Option<ContractInfo>, ChainError>;

    /// Instantiate and wait for finality.
    async fn instantiate(
        &self,
        signer: &Signer,
        request: InstantiateRequest,
    ) -> Result<InstantiateResult, ChainError>;

    async fn dry_run(&self, request: &CallRequest) -> Result<DryRun, ChainError>;

    /// Sign and submit a contract call.
    async fn submit(
        &self,
        signer: &Signer,
        request: CallRequest,
        options: SubmitOptions,
    ) -> Result<ExecReceipt, ChainError>;

    /// Next nonce for `account`, counting pending transactions.
    async fn account_nonce(&self, account: &AccountId) -> Result<u64, ChainError>;

    async fn original_account(
        &self,
        address: &DeployedAddress,
    ) -> Result<Option<AccountId>, ChainError>;

    async fn submit_runtime(
        &self,
        signer: &Signer,
        call: RuntimeCall,
        options: SubmitOptions,
    ) -> Result<ExecReceipt, ChainError>;
}

///
/// ChainConnector
///

#[async_trait]
pub trait ChainConnector: Send + Sync {
    async fn connect(&self, endpoints: &[String]) -> Result<Arc<dyn ChainClient>, ChainError>;
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_data_bytes_prefix_the_selector() {
        let data = CallData::encode("new", (7u32,)).expect("encode");
        let bytes = data.to_bytes();

        assert!(bytes.starts_with(b"new"));
        assert_eq!(&bytes[3..], data.args.as_slice());
    }

    #[test]
    fn receipts_without_block_are_pending() {
        let receipt = ExecReceipt {
            nonce: 3,
            ..Default::default()
        };

        assert!(!receipt.is_finalized());
    }
}
