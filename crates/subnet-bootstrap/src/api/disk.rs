use crate::{
    Error,
    api::Session,
    dto::{
        disk::{Disk, DiskRecord},
        page::{Page, PageRequest},
    },
    ids::DeployedAddress,
    infra::Signer,
    log,
    log::Topic,
    ops::contract::{CloudContract, ExecOptions},
};

/// Page size used when walking every disk of an owner.
pub const DISK_PAGE_SIZE: u64 = 100;

///
/// DiskApi
/// Disk management on the Cloud contract for the session signer.
///

#[derive(Clone)]
pub struct DiskApi {
    cloud: CloudContract,
    signer: Signer,
    options: ExecOptions,
}

impl DiskApi {
    pub fn new(session: &Session) -> Result<Self, Error> {
        Ok(Self {
            cloud: session.cloud()?,
            signer: *session.signer(),
            options: session.exec_options(),
        })
    }

    /// Address that owns disks created through this handle.
    #[must_use]
    pub fn owner(&self) -> DeployedAddress {
        self.signer.address()
    }

    pub async fn init_disk(&self, key: &str, size: u32) -> Result<DiskRecord, Error> {
        let id = self
            .cloud
            .create_disk(&self.signer, key.as_bytes(), size, self.options)
            .await?;
        log!(Topic::Disk, Ok, "create_disk: {key} ({size} GB) as disk {id}");

        Ok(DiskRecord {
            owner: self.owner(),
            id,
            disk: Disk::new(key.as_bytes().to_vec(), size),
        })
    }

    pub async fn delete_disk(&self, id: u64) -> Result<(), Error> {
        self.cloud.del_disk(&self.signer, id, self.options).await?;
        log!(Topic::Disk, Ok, "del_disk: disk {id}");

        Ok(())
    }

    pub async fn disk(&self, owner: DeployedAddress, id: u64) -> Result<Option<DiskRecord>, Error> {
        let disk = self.cloud.disk(&self.signer.account, owner, id).await?;

        Ok(disk.map(|disk| DiskRecord { owner, id, disk }))
    }

    /// Several disks at once; lookups run concurrently.
    pub async fn disks(
        &self,
        owner: DeployedAddress,
        ids: &[u64],
    ) -> Result<Vec<Option<Disk>>, Error> {
        self.cloud.disks(&self.signer.account, owner, ids).await
    }

    pub async fn user_disks(
        &self,
        owner: DeployedAddress,
        page: PageRequest,
    ) -> Result<Page<Disk>, Error> {
        self.cloud
            .user_disks(&self.signer.account, owner, page)
            .await
    }

    /// Every disk of `owner`, newest first.
    pub async fn all_user_disks(&self, owner: DeployedAddress) -> Result<Vec<DiskRecord>, Error> {
        let mut out = Vec::new();
        let mut request = PageRequest::first(DISK_PAGE_SIZE);

        loop {
            let page = self.user_disks(owner, request).await?;
            out.extend(
                page.entries
                    .into_iter()
                    .map(|(id, disk)| DiskRecord { owner, id, disk }),
            );

            match page.next_cursor {
                Some(cursor) => request.start = Some(cursor),
                None => break,
            }
        }

        Ok(out)
    }
}
