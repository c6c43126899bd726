use crate::{
    Error,
    dto::{
        disk::Disk,
        page::{Page, PageRequest},
    },
    ids::{AccountId, CodeHandle, ContractKind, DeployedAddress},
    infra::{ChainClient, ExecReceipt, Signer},
    ops::contract::{ContractHandle, ExecOptions},
};
use futures::future::try_join_all;
use std::sync::Arc;

///
/// CloudContract
///

#[derive(Clone)]
pub struct CloudContract {
    handle: ContractHandle,
}

impl CloudContract {
    #[must_use]
    pub fn new(address: DeployedAddress, client: Arc<dyn ChainClient>) -> Self {
        Self {
            handle: ContractHandle::new(ContractKind::Cloud, address, client),
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

    /// Subnet address stored by the constructor.
    pub async fn subnet_address(&self, origin: &AccountId) -> Result<DeployedAddress, Error> {
        let (addr, _) = self.handle.query("subnet_address", (), origin, 0).await?;

        Ok(addr)
    }

    /// Pod code hash stored by the constructor.
    pub async fn pod_contract(&self, origin: &AccountId) -> Result<CodeHandle, Error> {
        let (code, _) = self.handle.query("pod_contract", (), origin, 0).await?;

        Ok(code)
    }

    /// Create a disk owned by the signer; returns its per-owner id.
    pub async fn create_disk(
        &self,
        signer: &Signer,
        key: &[u8],
        size: u32,
        options: ExecOptions,
    ) -> Result<u64, Error> {
        let (id, _) = self
            .handle
            .exec_returning(signer, "create_disk", (key.to_vec(), size), options)
            .await?;

        Ok(id)
    }

    pub async fn del_disk(
        &self,
        signer: &Signer,
        id: u64,
        options: ExecOptions,
    ) -> Result<ExecReceipt, Error> {
        self.handle.exec(signer, "del_disk", (id,), options).await
    }

    pub async fn disk(
        &self,
        origin: &AccountId,
        user: DeployedAddress,
        id: u64,
    ) -> Result<Option<Disk>, Error> {
        let (disk, _) = self.handle.query("disk", (user, id), origin, 0).await?;

        Ok(disk)
    }

    /// Look up several disks concurrently; order follows `ids`.
    pub async fn disks(
        &self,
        origin: &AccountId,
        user: DeployedAddress,
        ids: &[u64],
    ) -> Result<Vec<Option<Disk>>, Error> {
        try_join_all(ids.iter().map(|id| self.disk(origin, user, *id))).await
    }

    /// Newest-first listing starting at `page.start` (inclusive).
    pub async fn user_disks(
        &self,
        origin: &AccountId,
        user: DeployedAddress,
        page: PageRequest,
    ) -> Result<Page<Disk>, Error> {
        let (entries, _) = self
            .handle
            .query("user_disks", (user, page.start, page.size), origin, 0)
            .await?;

        Ok(Page::from_desc(entries, page))
    }

    pub async fn set_code(
        &self,
        signer: &Signer,
        code: CodeHandle,
        options: ExecOptions,
    ) -> Result<ExecReceipt, Error> {
        self.handle.exec(signer, "set_code", (code,), options).await
    }
}
