use crate::{
    Error,
    dto::{
        endpoint::Endpoint,
        mortgage::{MortgageRecord, MortgageTerms},
        node::{ValidatorRecord, WorkerRecord},
        page::{Page, PageRequest},
    },
    ids::{AccountId, CodeHandle, ContractKind, DeployedAddress, NodeId},
    infra::{ChainClient, ExecReceipt, Signer},
    ops::contract::{ContractHandle, ExecOptions},
};
use std::sync::Arc;

///
/// SubnetContract
///
/// Validator (secret node) and worker registry. Governance calls
/// (`set_boot_nodes`, `validator_join`, `set_region`, `set_code`) are
/// accepted only from the deployer.
///

#[derive(Clone)]
pub struct SubnetContract {
    handle: ContractHandle,
}

impl SubnetContract {
    #[must_use]
    pub fn new(address: DeployedAddress, client: Arc<dyn ChainClient>) -> Self {
        Self {
            handle: ContractHandle::new(ContractKind::Subnet, address, client),
        }
    }

    #[must_use]
    pub const fn handle(&self) -> &ContractHandle {
        &self.handle
    }

    #[must_use]
    pub const fn address(&self) -> DeployedAddress {
        self.handle.address()
    }

    //
    // ─────────────────────────────── VALIDATORS ───────────────────────────────
    //

    /// Register a secret node; returns the slot the contract assigned.
    pub async fn secret_register(
        &self,
        signer: &Signer,
        name: &str,
        validator_id: AccountId,
        p2p_id: AccountId,
        endpoint: &Endpoint,
        options: ExecOptions,
    ) -> Result<NodeId, Error> {
        let args = (
            name.as_bytes().to_vec(),
            validator_id,
            p2p_id,
            endpoint.ip.clone(),
            endpoint.port,
        );
        let (id, _) = self
            .handle
            .exec_returning(signer, "secret_register", args, options)
            .await?;

        Ok(id)
    }

    pub async fn secrets(&self, origin: &AccountId) -> Result<Vec<(NodeId, ValidatorRecord)>, Error> {
        self.query(origin, "secrets", ()).await
    }

    /// Nodes currently validating, with their voting power.
    pub async fn validators(
        &self,
        origin: &AccountId,
    ) -> Result<Vec<(NodeId, ValidatorRecord, u32)>, Error> {
        self.query(origin, "validators", ()).await
    }

    /// Validator-set changes queued for the next epoch.
    pub async fn pending_secrets(&self, origin: &AccountId) -> Result<Vec<(NodeId, u32)>, Error> {
        self.query(origin, "get_pending_secrets", ()).await
    }

    /// Sorted, deduplicated and written over the previous set.
    pub async fn set_boot_nodes(
        &self,
        signer: &Signer,
        nodes: &[NodeId],
        options: ExecOptions,
    ) -> Result<ExecReceipt, Error> {
        self.handle
            .exec(signer, "set_boot_nodes", (nodes.to_vec(),), options)
            .await
    }

    pub async fn boot_nodes(&self, origin: &AccountId) -> Result<Vec<ValidatorRecord>, Error> {
        self.query(origin, "boot_nodes", ()).await
    }

    pub async fn validator_join(
        &self,
        signer: &Signer,
        id: NodeId,
        options: ExecOptions,
    ) -> Result<ExecReceipt, Error> {
        self.handle
            .exec(signer, "validator_join", (id,), options)
            .await
    }

    //
    // ──────────────────────────────── REGIONS ─────────────────────────────────
    //

    pub async fn set_region(
        &self,
        signer: &Signer,
        name: &str,
        options: ExecOptions,
    ) -> Result<ExecReceipt, Error> {
        self.handle
            .exec(signer, "set_region", (name.as_bytes().to_vec(),), options)
            .await
    }

    pub async fn region(&self, origin: &AccountId, id: u32) -> Result<Option<String>, Error> {
        let name: Option<Vec<u8>> = self.query(origin, "region", (id,)).await?;

        Ok(name.map(|n| String::from_utf8_lossy(&n).into_owned()))
    }

    //
    // ──────────────────────────────── WORKERS ─────────────────────────────────
    //

    /// Register a worker cluster owned by the signer; returns its id.
    #[allow(clippy::too_many_arguments)]
    pub async fn worker_register(
        &self,
        signer: &Signer,
        name: &str,
        p2p_id: AccountId,
        endpoint: &Endpoint,
        level: u8,
        region_id: u32,
        options: ExecOptions,
    ) -> Result<NodeId, Error> {
        let args = (
            name.as_bytes().to_vec(),
            p2p_id,
            endpoint.ip.clone(),
            endpoint.port,
            level,
            region_id,
        );
        let (id, _) = self
            .handle
            .exec_returning(signer, "worker_register", args, options)
            .await?;

        Ok(id)
    }

    pub async fn worker(&self, origin: &AccountId, id: NodeId) -> Result<Option<WorkerRecord>, Error> {
        self.query(origin, "worker", (id,)).await
    }

    /// Newest-first worker listing.
    pub async fn workers(
        &self,
        origin: &AccountId,
        page: PageRequest,
    ) -> Result<Page<WorkerRecord>, Error> {
        let entries = self
            .query(origin, "workers", (page.start, page.size))
            .await?;

        Ok(Page::from_desc(entries, page))
    }

    /// Worker registered under a p2p identity.
    pub async fn mint_worker(
        &self,
        origin: &AccountId,
        p2p_id: AccountId,
    ) -> Result<Option<(NodeId, WorkerRecord)>, Error> {
        self.query(origin, "mint_worker", (p2p_id,)).await
    }

    /// Commit collateral against a worker; returns the mortgage id.
    pub async fn worker_mortgage(
        &self,
        signer: &Signer,
        worker_id: NodeId,
        terms: &MortgageTerms,
        options: ExecOptions,
    ) -> Result<u32, Error> {
        let args = (
            worker_id,
            terms.cpu,
            terms.mem,
            terms.cvm_cpu,
            terms.cvm_mem,
            terms.disk,
            terms.gpu,
            terms.deposit,
        );
        let (id, _) = self
            .handle
            .exec_returning(signer, "worker_mortgage", args, options)
            .await?;

        Ok(id)
    }

    pub async fn worker_mortgages(
        &self,
        origin: &AccountId,
        worker_id: NodeId,
    ) -> Result<Vec<MortgageRecord>, Error> {
        self.query(origin, "worker_mortgages", (worker_id,)).await
    }

    //
    // ──────────────────────────────── UPGRADE ─────────────────────────────────
    //

    pub async fn set_code(
        &self,
        signer: &Signer,
        code: CodeHandle,
        options: ExecOptions,
    ) -> Result<ExecReceipt, Error> {
        self.handle.exec(signer, "set_code", (code,), options).await
    }

    async fn query<A, R>(&self, origin: &AccountId, method: &str, args: A) -> Result<R, Error>
    where
        A: candid::utils::ArgumentEncoder,
        R: candid::CandidType + serde::de::DeserializeOwned,
    {
        let (value, _) = self.handle.query(method, args, origin, 0).await?;

        Ok(value)
    }
}

