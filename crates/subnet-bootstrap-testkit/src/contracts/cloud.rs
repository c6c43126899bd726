use super::{Ctx, Outcome, decode, desc_page, raw, reply, revert};
use std::collections::{BTreeMap, HashMap};
use subnet_bootstrap::{
    dto::{disk::Disk, revert::CloudError},
    ids::{CodeHandle, DeployedAddress},
};

///
/// CloudState
///
/// Disk ids are per owner and never reused, so deleted ids leave gaps.
///

#[derive(Clone, Debug)]
pub struct CloudState {
    pub gov: DeployedAddress,
    subnet: DeployedAddress,
    pod_code: CodeHandle,
    disks: HashMap<DeployedAddress, UserDisks>,
}

#[derive(Clone, Debug, Default)]
struct UserDisks {
    next: u64,
    live: BTreeMap<u64, Disk>,
}

impl CloudState {
    pub(super) fn new(gov: DeployedAddress, subnet: DeployedAddress, pod_code: CodeHandle) -> Self {
        Self {
            gov,
            subnet,
            pod_code,
            disks: HashMap::new(),
        }
    }

    pub(super) fn call(&mut self, ctx: &Ctx, method: &str, args: &[u8]) -> Outcome {
        match method {
            "subnet_address" => {
                decode::<()>(args)?;
                reply(self.subnet)
            }
            "pod_contract" => {
                decode::<()>(args)?;
                reply(self.pod_code)
            }
            "create_disk" => {
                let (key, size) = decode::<(Vec<u8>, u32)>(args)?;
                let user = self.disks.entry(ctx.caller).or_default();
                let id = user.next;
                user.next += 1;
                user.live.insert(id, Disk::new(key, size));

                reply(id)
            }
            "del_disk" => {
                let (id,) = decode::<(u64,)>(args)?;
                self.disks
                    .get_mut(&ctx.caller)
                    .and_then(|user| user.live.remove(&id))
                    .ok_or_else(|| revert(CloudError::DelFailed))?;

                reply(())
            }
            "disk" => {
                let (user, id) = decode::<(DeployedAddress, u64)>(args)?;
                reply(self.disks.get(&user).and_then(|u| u.live.get(&id)).cloned())
            }
            "user_disks" => {
                let (user, start, size) = decode::<(DeployedAddress, Option<u64>, u64)>(args)?;
                let page = self
                    .disks
                    .get(&user)
                    .map(|u| desc_page(&u.live, start, size))
                    .unwrap_or_default();

                reply(page)
            }

            _ => Err(raw(format!("cloud has no method '{method}'"))),
        }
    }
}
