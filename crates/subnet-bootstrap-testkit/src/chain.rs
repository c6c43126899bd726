//!
//! In-memory chain.
//!
//! Finalized state is a map of contract instances. Submissions that do not
//! wait for finality sit in a pending queue until the next finalizing
//! operation or an explicit [`SimChain::finalize`]; queries and dry runs only
//! see finalized state.
//!

use crate::{
    artifact,
    contracts::{ContractState, Ctx},
};
use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use subnet_bootstrap::{
    ids::{AccountId, CodeHandle, ContractKind, DeployedAddress},
    infra::{
        CallRequest, CallResult, ChainClient, ChainConnector, ChainError, ContractInfo, DryRun,
        ExecReceipt, GasEstimate, InstantiateRequest, InstantiateResult, RuntimeCall,
        Signer, SubmitOptions,
    },
    ops::derive_address,
};

pub const DEFAULT_MAX_CODE_SIZE: usize = 256 * 1024;

const BASE_REF_TIME: u64 = 10_000;
const REF_TIME_PER_BYTE: u64 = 100;
const PROOF_SIZE: u64 = 4_096;

///
/// SimChain
///
/// Cheap to clone; clones share the same chain.
///

#[derive(Clone, Default)]
pub struct SimChain {
    state: Arc<Mutex<SimState>>,
}

#[derive(Default)]
struct SimState {
    block: u64,
    codes: HashMap<CodeHandle, ContractKind>,
    contracts: HashMap<DeployedAddress, Instance>,
    nonces: HashMap<AccountId, u64>,
    pending: Vec<PendingTx>,
    mapped: HashMap<DeployedAddress, AccountId>,
    offline: bool,
    max_code_size: Option<usize>,
    instantiate_rejection: Option<String>,
}

#[derive(Clone, Debug)]
struct Instance {
    kind: ContractKind,
    code_hash: CodeHandle,
    deployer: AccountId,
    storage: ContractState,
}

#[derive(Debug)]
struct PendingTx {
    origin: AccountId,
    body: TxBody,
}

#[derive(Debug)]
enum TxBody {
    Call(CallRequest),
    Runtime(RuntimeCall),
}

impl SimChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ───── TEST CONTROLS ─────

    /// Make every operation fail with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Refuse the next instantiations with `reason` until cleared.
    pub fn reject_instantiation(&self, reason: Option<&str>) {
        self.lock().instantiate_rejection = reason.map(str::to_string);
    }

    pub fn set_max_code_size(&self, bytes: usize) {
        self.lock().max_code_size = Some(bytes);
    }

    /// Include every pending transaction; returns how many were applied.
    pub fn finalize(&self) -> usize {
        self.lock().finalize_pending().len()
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    #[must_use]
    pub fn block(&self) -> u64 {
        self.lock().block
    }

    /// Kind of the finalized contract at `address`.
    #[must_use]
    pub fn contract_kind(&self, address: &DeployedAddress) -> Option<ContractKind> {
        self.lock().contracts.get(address).map(|i| i.kind)
    }

    #[must_use]
    pub fn contract_count(&self) -> usize {
        self.lock().contracts.len()
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn online(&self) -> Result<MutexGuard<'_, SimState>, ChainError> {
        let state = self.lock();
        if state.offline {
            return Err(ChainError::Unavailable("connection refused".to_string()));
        }

        Ok(state)
    }
}

impl SimState {
    fn next_nonce(&self, account: &AccountId) -> u64 {
        let finalized = self.nonces.get(account).copied().unwrap_or_default();
        let pending = self.pending.iter().filter(|tx| tx.origin == *account).count();

        finalized + u64::try_from(pending).unwrap_or(u64::MAX)
    }

    /// Validate the nonce and queue a transaction; returns its nonce.
    fn enqueue(
        &mut self,
        origin: AccountId,
        body: TxBody,
        nonce: Option<u64>,
    ) -> Result<u64, ChainError> {
        let expected = self.next_nonce(&origin);
        if let Some(nonce) = nonce
            && nonce != expected
        {
            return Err(ChainError::Rejected(format!(
                "invalid nonce {nonce}, expected {expected}"
            )));
        }
        self.pending.push(PendingTx { origin, body });

        Ok(expected)
    }

    /// Apply pending transactions in submission order within one block.
    fn finalize_pending(&mut self) -> Vec<Result<Vec<u8>, ChainError>> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        self.block += 1;

        let pending = std::mem::take(&mut self.pending);
        pending
            .into_iter()
            .map(|tx| {
                *self.nonces.entry(tx.origin).or_default() += 1;
                self.apply(tx)
            })
            .collect()
    }

    fn apply(&mut self, tx: PendingTx) -> Result<Vec<u8>, ChainError> {
        match tx.body {
            TxBody::Call(request) => {
                match self.execute(&request, true)? {
                    CallResult::Returned(output) => Ok(output),
                    CallResult::Reverted(data) => Err(ChainError::Reverted(data)),
                }
            }
            TxBody::Runtime(RuntimeCall::MapAccount) => {
                let address = DeployedAddress::from_account(&tx.origin);
                if self.mapped.contains_key(&address) {
                    return Err(ChainError::Rejected("AccountAlreadyMapped".to_string()));
                }
                self.mapped.insert(address, tx.origin);

                Ok(Vec::new())
            }
        }
    }

    /// Run a call; state changes are kept only when `commit` is set and the
    /// call did not revert.
    fn execute(&mut self, request: &CallRequest, commit: bool) -> Result<CallResult, ChainError> {
        let ctx = Ctx {
            caller: DeployedAddress::from_account(&request.origin),
            block: self.block,
        };

        if request.data.method == "set_code" {
            return self.set_code(&ctx, request, commit);
        }

        let instance = self
            .contracts
            .get(&request.dest)
            .ok_or_else(|| ChainError::Rejected(format!("no contract at {}", request.dest)))?;

        let mut storage = instance.storage.clone();
        let result = storage.call(&ctx, &request.data.method, &request.data.args);

        match result {
            Ok(output) => {
                if commit && let Some(instance) = self.contracts.get_mut(&request.dest) {
                    instance.storage = storage;
                }
                Ok(CallResult::Returned(output))
            }
            Err(data) => Ok(CallResult::Reverted(data)),
        }
    }

    /// Replace an instance's code, keeping its address and storage.
    fn set_code(
        &mut self,
        ctx: &Ctx,
        request: &CallRequest,
        commit: bool,
    ) -> Result<CallResult, ChainError> {
        let instance = self
            .contracts
            .get(&request.dest)
            .ok_or_else(|| ChainError::Rejected(format!("no contract at {}", request.dest)))?;

        if instance.storage.gov() != Some(ctx.caller) {
            return Ok(CallResult::Reverted(instance.storage.not_gov()));
        }

        let Ok((code,)) = candid::decode_args::<(CodeHandle,)>(&request.data.args) else {
            return Ok(CallResult::Reverted(instance.storage.set_code_failed()));
        };
        if self.codes.get(&code) != Some(&instance.kind) {
            return Ok(CallResult::Reverted(instance.storage.set_code_failed()));
        }

        if commit && let Some(instance) = self.contracts.get_mut(&request.dest) {
            instance.code_hash = code;
        }

        let reply = candid::encode_one(()).map_err(|e| ChainError::Rejected(e.to_string()))?;

        Ok(CallResult::Returned(reply))
    }

    fn gas(request: &CallRequest) -> GasEstimate {
        let bytes = u64::try_from(request.data.method.len() + request.data.args.len())
            .unwrap_or(u64::MAX);

        GasEstimate {
            ref_time: BASE_REF_TIME.saturating_add(bytes.saturating_mul(REF_TIME_PER_BYTE)),
            proof_size: PROOF_SIZE,
        }
    }
}

#[async_trait]
impl ChainClient for SimChain {
    async fn upload_code(
        &self,
        signer: &Signer,
        code: Vec<u8>,
    ) -> Result<CodeHandle, ChainError> {
        let mut state = self.online()?;

        if code.is_empty() {
            return Err(ChainError::Rejected("empty code".to_string()));
        }
        let limit = state.max_code_size.unwrap_or(DEFAULT_MAX_CODE_SIZE);
        if code.len() > limit {
            return Err(ChainError::Rejected(format!(
                "code size {} exceeds limit {limit}",
                code.len()
            )));
        }
        let (kind, _) = artifact::parse(&code)
            .ok_or_else(|| ChainError::Rejected("CodeRejected: unrecognised blob".to_string()))?;

        state.finalize_pending();
        let handle = CodeHandle::of(&code);
        if state.codes.insert(handle, kind).is_none() {
            state.block += 1;
            *state.nonces.entry(signer.account).or_default() += 1;
        }

        Ok(handle)
    }

    async fn contract_info(
        &self,
        address: &DeployedAddress,
    ) -> Result<Option<ContractInfo>, ChainError> {
        let state = self.online()?;

        Ok(state.contracts.get(address).map(|i| ContractInfo {
            code_hash: i.code_hash,
            deployer: i.deployer,
        }))
    }

    async fn instantiate(
        &self,
        signer: &Signer,
        request: InstantiateRequest,
    ) -> Result<InstantiateResult, ChainError> {
        let mut state = self.online()?;

        if let Some(reason) = &state.instantiate_rejection {
            return Err(ChainError::Rejected(reason.clone()));
        }
        let kind = *state
            .codes
            .get(&request.code_hash)
            .ok_or_else(|| ChainError::Rejected(format!("CodeNotFound: {}", request.code_hash)))?;

        state.finalize_pending();

        let address = derive_address(
            &signer.account,
            &request.code_hash,
            &request.ctor.to_bytes(),
            &request.salt,
        );
        if state.contracts.contains_key(&address) {
            return Err(ChainError::Rejected(format!("DuplicateContract: {address}")));
        }

        let ctx = Ctx {
            caller: signer.address(),
            block: state.block + 1,
        };
        let storage = ContractState::construct(
            kind,
            &ctx,
            &request.ctor.method,
            &request.ctor.args,
            |addr| state.contracts.get(addr).map(|i| i.kind),
        )
        .map_err(ChainError::Reverted)?;

        state.block += 1;
        *state.nonces.entry(signer.account).or_default() += 1;
        state.contracts.insert(
            address,
            Instance {
                kind,
                code_hash: request.code_hash,
                deployer: signer.account,
                storage,
            },
        );

        Ok(InstantiateResult {
            address,
            block: state.block,
        })
    }

    async fn dry_run(&self, request: &CallRequest) -> Result<DryRun, ChainError> {
        let mut state = self.online()?;
        let result = state.execute(request, false)?;

        Ok(DryRun {
            result,
            gas: SimState::gas(request),
        })
    }

    async fn submit(
        &self,
        signer: &Signer,
        request: CallRequest,
        options: SubmitOptions,
    ) -> Result<ExecReceipt, ChainError> {
        let mut state = self.online()?;

        if let Some(limit) = request.gas_limit
            && limit.ref_time < SimState::gas(&request).ref_time
        {
            return Err(ChainError::Rejected("OutOfGas".to_string()));
        }

        let nonce = state.enqueue(signer.account, TxBody::Call(request), options.nonce)?;
        if !options.wait_finality {
            return Ok(ExecReceipt {
                nonce,
                ..Default::default()
            });
        }

        let mut results = state.finalize_pending();
        let output = results
            .pop()
            .ok_or_else(|| ChainError::Rejected("transaction dropped".to_string()))??;

        Ok(ExecReceipt {
            nonce,
            block: Some(state.block),
            output: Some(output),
        })
    }

    async fn account_nonce(&self, account: &AccountId) -> Result<u64, ChainError> {
        Ok(self.online()?.next_nonce(account))
    }

    async fn original_account(
        &self,
        address: &DeployedAddress,
    ) -> Result<Option<AccountId>, ChainError> {
        Ok(self.online()?.mapped.get(address).copied())
    }

    async fn submit_runtime(
        &self,
        signer: &Signer,
        call: RuntimeCall,
        options: SubmitOptions,
    ) -> Result<ExecReceipt, ChainError> {
        let mut state = self.online()?;

        let nonce = state.enqueue(signer.account, TxBody::Runtime(call), options.nonce)?;
        if !options.wait_finality {
            return Ok(ExecReceipt {
                nonce,
                ..Default::default()
            });
        }

        let mut results = state.finalize_pending();
        let output = results
            .pop()
            .ok_or_else(|| ChainError::Rejected("transaction dropped".to_string()))??;

        Ok(ExecReceipt {
            nonce,
            block: Some(state.block),
            output: Some(output),
        })
    }
}

#[async_trait]
impl ChainConnector for SimChain {
    async fn connect(&self, endpoints: &[String]) -> Result<Arc<dyn ChainClient>, ChainError> {
        if endpoints.is_empty() {
            return Err(ChainError::Unavailable("no endpoints configured".to_string()));
        }
        drop(self.online()?);

        Ok(Arc::new(self.clone()))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fake;
    use futures::executor::block_on;
    use subnet_bootstrap::infra::CallData;

    fn signer(seed: u32) -> Signer {
        Signer::new(Fake::account(seed), 42)
    }

    #[test]
    fn identical_uploads_share_a_handle() {
        let chain = SimChain::new();
        let code = artifact::code(ContractKind::Pod, 1);

        let a = block_on(chain.upload_code(&signer(1), code.clone())).expect("first upload");
        let b = block_on(chain.upload_code(&signer(1), code)).expect("second upload");

        assert_eq!(a, b);
    }

    #[test]
    fn unrecognised_blobs_are_rejected() {
        let chain = SimChain::new();

        let err = block_on(chain.upload_code(&signer(1), b"not a contract".to_vec()))
            .expect_err("foreign bytes");

        assert!(matches!(err, ChainError::Rejected(_)));
    }

    #[test]
    fn pending_calls_are_invisible_until_finalized() {
        let chain = SimChain::new();
        let gov = signer(1);
        let code = block_on(chain.upload_code(&gov, artifact::code(ContractKind::Subnet, 1)))
            .expect("upload");
        let ctor = CallData::encode("new", ()).expect("ctor");
        let subnet = block_on(chain.instantiate(
            &gov,
            InstantiateRequest {
                code_hash: code,
                ctor,
                salt: Fake::salt(1),
                value: 0,
            },
        ))
        .expect("instantiate")
        .address;

        let request = CallRequest {
            origin: gov.account,
            dest: subnet,
            data: CallData::encode("set_region", (b"eu".to_vec(),)).expect("args"),
            value: 0,
            gas_limit: None,
        };
        let nonce_before = block_on(chain.account_nonce(&gov.account)).expect("nonce");
        let receipt = block_on(chain.submit(&gov, request, SubmitOptions::default()))
            .expect("submit");

        assert!(!receipt.is_finalized());
        assert_eq!(chain.pending_len(), 1);
        assert_eq!(
            block_on(chain.account_nonce(&gov.account)).expect("nonce"),
            nonce_before + 1,
            "pending transactions count toward the next nonce"
        );

        assert_eq!(chain.finalize(), 1);
        assert_eq!(chain.pending_len(), 0);
    }

    #[test]
    fn offline_chain_reports_transport_errors() {
        let chain = SimChain::new();
        chain.set_offline(true);

        let err = block_on(chain.account_nonce(&Fake::account(1))).expect_err("offline");

        assert!(matches!(err, ChainError::Unavailable(_)));
    }
}
