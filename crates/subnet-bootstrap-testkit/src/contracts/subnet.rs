use super::{Ctx, Outcome, decode, desc_page, raw, reply, revert};
use std::collections::BTreeMap;
use subnet_bootstrap::{
    dto::{
        endpoint::Ip,
        mortgage::{MortgageRecord, MortgageTerms},
        node::{ValidatorRecord, WorkerRecord},
        revert::SubnetError,
    },
    ids::{AccountId, DeployedAddress, NodeId},
};

///
/// SubnetState
///
/// Storage of one Subnet instance. Slots are assigned in registration order
/// starting at 0; the first validator becomes the initial running set.
///

#[derive(Clone, Debug)]
pub struct SubnetState {
    pub gov: DeployedAddress,
    secrets: BTreeMap<NodeId, ValidatorRecord>,
    running: Vec<(NodeId, u32)>,
    pending: Vec<(NodeId, u32)>,
    boot_nodes: Vec<NodeId>,
    regions: Vec<Vec<u8>>,
    workers: BTreeMap<NodeId, WorkerRecord>,
    mortgages: BTreeMap<NodeId, Vec<MortgageRecord>>,
}

impl SubnetState {
    pub(super) const fn new(gov: DeployedAddress) -> Self {
        Self {
            gov,
            secrets: BTreeMap::new(),
            running: Vec::new(),
            pending: Vec::new(),
            boot_nodes: Vec::new(),
            regions: Vec::new(),
            workers: BTreeMap::new(),
            mortgages: BTreeMap::new(),
        }
    }

    pub(super) fn call(&mut self, ctx: &Ctx, method: &str, args: &[u8]) -> Outcome {
        match method {
            // validators
            "secret_register" => self.secret_register(ctx, args),
            "secrets" => {
                decode::<()>(args)?;
                reply(desc_page(&self.secrets, None, u64::MAX))
            }
            "validators" => {
                decode::<()>(args)?;
                reply(self.running_records())
            }
            "get_pending_secrets" => {
                decode::<()>(args)?;
                reply(self.pending.clone())
            }
            "set_boot_nodes" => self.set_boot_nodes(ctx, args),
            "boot_nodes" => {
                decode::<()>(args)?;
                self.boot_node_records()
            }
            "validator_join" => self.validator_join(ctx, args),

            // workers
            "set_region" => self.set_region(ctx, args),
            "region" => {
                let (id,) = decode::<(u32,)>(args)?;
                let name = usize::try_from(id)
                    .ok()
                    .and_then(|i| self.regions.get(i))
                    .cloned();
                reply(name)
            }
            "worker_register" => self.worker_register(ctx, args),
            "worker" => {
                let (id,) = decode::<(NodeId,)>(args)?;
                reply(self.workers.get(&id).cloned())
            }
            "workers" => {
                let (start, size) = decode::<(Option<NodeId>, u64)>(args)?;
                reply(desc_page(&self.workers, start, size))
            }
            "mint_worker" => {
                let (p2p_id,) = decode::<(AccountId,)>(args)?;
                reply(self.worker_by_p2p(&p2p_id))
            }
            "worker_mortgage" => self.worker_mortgage(ctx, args),
            "worker_mortgages" => {
                let (id,) = decode::<(NodeId,)>(args)?;
                reply(self.mortgages.get(&id).cloned().unwrap_or_default())
            }

            _ => Err(raw(format!("subnet has no method '{method}'"))),
        }
    }

    // ───── VALIDATORS ─────

    fn secret_register(&mut self, ctx: &Ctx, args: &[u8]) -> Outcome {
        self.ensure_gov(ctx)?;
        let (name, validator_id, p2p_id, ip, port) =
            decode::<(Vec<u8>, AccountId, AccountId, Ip, u32)>(args)?;

        if self.secrets.values().any(|v| v.p2p_id == p2p_id) {
            return Err(revert(SubnetError::SecretNodeAlreadyExists));
        }

        let id = next_id(&self.secrets);
        self.secrets.insert(
            id,
            ValidatorRecord {
                name,
                owner: ctx.caller,
                validator_id,
                p2p_id,
                ip,
                port,
                start_block: ctx.block,
                terminal_block: None,
                status: 0,
            },
        );
        if id == 0 {
            self.running.push((id, 1));
        }

        reply(id)
    }

    fn set_boot_nodes(&mut self, ctx: &Ctx, args: &[u8]) -> Outcome {
        self.ensure_gov(ctx)?;
        let (mut nodes,) = decode::<(Vec<NodeId>,)>(args)?;

        if nodes.iter().any(|id| !self.secrets.contains_key(id)) {
            return Err(revert(SubnetError::NodeNotExist));
        }
        nodes.sort_unstable();
        nodes.dedup();
        self.boot_nodes = nodes;

        reply(())
    }

    fn validator_join(&mut self, ctx: &Ctx, args: &[u8]) -> Outcome {
        self.ensure_gov(ctx)?;
        let (id,) = decode::<(NodeId,)>(args)?;

        if !self.secrets.contains_key(&id) {
            return Err(revert(SubnetError::NodeNotExist));
        }
        if self.running.iter().chain(&self.pending).any(|(n, _)| *n == id) {
            return Err(revert(SubnetError::NodeIsRunning));
        }
        self.pending.push((id, 1));

        reply(())
    }

    fn running_records(&self) -> Vec<(NodeId, ValidatorRecord, u32)> {
        self.running
            .iter()
            .filter_map(|(id, power)| self.secrets.get(id).map(|v| (*id, v.clone(), *power)))
            .collect()
    }

    fn boot_node_records(&self) -> Outcome {
        let mut records = Vec::with_capacity(self.boot_nodes.len());
        for id in &self.boot_nodes {
            let record = self
                .secrets
                .get(id)
                .ok_or_else(|| revert(SubnetError::NodeNotExist))?;
            records.push(record.clone());
        }

        reply(records)
    }

    // ───── WORKERS ─────

    fn set_region(&mut self, ctx: &Ctx, args: &[u8]) -> Outcome {
        self.ensure_gov(ctx)?;
        let (name,) = decode::<(Vec<u8>,)>(args)?;
        self.regions.push(name);

        reply(())
    }

    fn worker_register(&mut self, ctx: &Ctx, args: &[u8]) -> Outcome {
        let (name, p2p_id, ip, port, level, region_id) =
            decode::<(Vec<u8>, AccountId, Ip, u32, u8, u32)>(args)?;

        if usize::try_from(region_id).map_or(true, |i| i >= self.regions.len()) {
            return Err(revert(SubnetError::RegionNotExist));
        }
        if self.worker_by_p2p(&p2p_id).is_some() {
            return Err(revert(SubnetError::WorkerAlreadyExists));
        }

        let id = next_id(&self.workers);
        self.workers.insert(
            id,
            WorkerRecord {
                name,
                owner: ctx.caller,
                p2p_id,
                ip,
                port,
                level,
                region_id,
                start_block: ctx.block,
                stop_block: None,
                terminal_block: None,
                status: 0,
            },
        );

        reply(id)
    }

    fn worker_mortgage(&mut self, ctx: &Ctx, args: &[u8]) -> Outcome {
        let (worker_id, cpu, mem, cvm_cpu, cvm_mem, disk, gpu, deposit) =
            decode::<(NodeId, u32, u32, u32, u32, u32, u32, u128)>(args)?;

        let worker = self
            .workers
            .get(&worker_id)
            .ok_or_else(|| revert(SubnetError::WorkerNotExist))?;
        if worker.owner != ctx.caller {
            return Err(revert(SubnetError::WorkerNotOwnedByCaller));
        }
        if !worker.is_offline() {
            return Err(revert(SubnetError::WorkerStatusNotReady));
        }

        let terms = MortgageTerms {
            cpu,
            mem,
            cvm_cpu,
            cvm_mem,
            disk,
            gpu,
            deposit,
        };
        let list = self.mortgages.entry(worker_id).or_default();
        let id = u32::try_from(list.len()).map_err(|_| raw("too many mortgages".to_string()))?;
        list.push(MortgageRecord::from_terms(&terms));

        reply(id)
    }

    fn worker_by_p2p(&self, p2p_id: &AccountId) -> Option<(NodeId, WorkerRecord)> {
        self.workers
            .iter()
            .find(|(_, w)| w.p2p_id == *p2p_id)
            .map(|(id, w)| (*id, w.clone()))
    }

    fn ensure_gov(&self, ctx: &Ctx) -> Result<(), Vec<u8>> {
        if ctx.caller == self.gov {
            Ok(())
        } else {
            Err(revert(SubnetError::MustCallByGovContract))
        }
    }
}

fn next_id<T>(map: &BTreeMap<NodeId, T>) -> NodeId {
    map.last_key_value().map_or(0, |(id, _)| id + 1)
}
