//! Subnet bootstrap.
//!
//! `NetworkBootstrapper` drives one run of the bootstrap state machine:
//!
//! upload pod code → deploy Subnet → deploy Cloud → register validators →
//! set boot nodes → validators join → set region → register workers →
//! mortgage workers.
//!
//! Each step is a method that first checks the transition, then performs
//! its exec calls, then advances. A failed step halts the run; nothing
//! already committed is rolled back. Rerunning is safe because deployment
//! is idempotent for fixed salts, slots already active are not joined
//! again and, with `skip_occupied`, identities already registered at their
//! slots are skipped.
//!
//! Without finality waits only intermediate writes are left pending. Calls
//! that return a slot, worker or mortgage id always wait, and so does the
//! last write of every step, so each step starts against settled state.

mod plan;
mod register;
mod report;
mod state;

pub use plan::{BootstrapPlan, NetworkArtifacts, ValidatorPlan, WorkerPlan};
pub use register::{register_validator, register_worker};
pub use report::BootstrapReport;
pub use state::{BootstrapMachine, BootstrapState};

use crate::{
    Error, ErrorClass,
    dto::outcome::{DeployOutcome, RegisterOutcome},
    ids::{CodeHandle, ContractKind, DeployedAddress, NodeId, Salt},
    infra::{ChainClient, Signer},
    log,
    log::Topic,
    ops::{
        artifact::ArtifactStore,
        contract::{ExecOptions, SubnetContract},
        deploy::{CodeSource, ContractDeployer},
        sequence::TxSequencer,
    },
};
use std::{collections::HashSet, sync::Arc};
use thiserror::Error as ThisError;

///
/// BootstrapError
///

#[derive(Debug, ThisError)]
pub enum BootstrapError {
    #[error("bootstrap has no {0} yet")]
    Missing(&'static str),

    #[error("cannot move from {from} to {to}")]
    OutOfOrder {
        from: BootstrapState,
        to: BootstrapState,
    },

    #[error("{name} registration rejected: {reason}")]
    RegistrationRejected { name: String, reason: String },

    #[error("validator expected at slot {expected} was registered at slot {got}")]
    SlotMismatch { expected: NodeId, got: NodeId },

    #[error("{name} is already registered at slot {slot}")]
    SlotOccupied { name: String, slot: NodeId },

    #[error("step {} failed (target {}): {source}", .step.step_name(), fmt_target(.target))]
    StepFailed {
        step: BootstrapState,
        target: Option<DeployedAddress>,
        source: Box<Error>,
    },
}

impl BootstrapError {
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Missing(_) | Self::OutOfOrder { .. } | Self::SlotMismatch { .. } => {
                ErrorClass::Invariant
            }
            Self::RegistrationRejected { .. } => ErrorClass::Rejection,
            Self::SlotOccupied { .. } => ErrorClass::AlreadyExists,
            Self::StepFailed { source, .. } => source.class(),
        }
    }

    /// The step a failure happened in, for operator resume.
    #[must_use]
    pub const fn failed_step(&self) -> Option<BootstrapState> {
        match self {
            Self::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}

#[allow(clippy::ref_option)]
fn fmt_target(target: &Option<DeployedAddress>) -> String {
    target.map_or_else(|| "-".to_string(), |t| t.to_string())
}

///
/// NetworkBootstrapper
///

pub struct NetworkBootstrapper {
    client: Arc<dyn ChainClient>,
    signer: Signer,
    plan: BootstrapPlan,
    machine: BootstrapMachine,
    sequencer: Option<TxSequencer>,
    wait_finality: bool,
    subnet: Option<SubnetContract>,
    subnet_code: Option<CodeHandle>,
    report: BootstrapReport,
}

impl NetworkBootstrapper {
    #[must_use]
    pub fn new(client: Arc<dyn ChainClient>, signer: Signer, plan: BootstrapPlan) -> Self {
        Self {
            client,
            signer,
            plan,
            machine: BootstrapMachine::new(),
            sequencer: None,
            wait_finality: true,
            subnet: None,
            subnet_code: None,
            report: BootstrapReport::default(),
        }
    }

    /// Continue against an existing Subnet from `state`.
    #[must_use]
    pub fn attach(
        client: Arc<dyn ChainClient>,
        signer: Signer,
        plan: BootstrapPlan,
        subnet: DeployedAddress,
        state: BootstrapState,
    ) -> Self {
        let mut this = Self::new(client.clone(), signer, plan);
        this.machine = BootstrapMachine::attach(state);
        this.subnet = Some(SubnetContract::new(subnet, client));
        this.report.state = state;
        this.report.subnet = Some(DeployOutcome::AlreadyDeployed(subnet));

        this
    }

    #[must_use]
    pub const fn with_finality(mut self, wait_finality: bool) -> Self {
        self.wait_finality = wait_finality;
        self
    }

    #[must_use]
    pub const fn state(&self) -> BootstrapState {
        self.machine.state()
    }

    #[must_use]
    pub const fn report(&self) -> &BootstrapReport {
        &self.report
    }

    #[must_use]
    pub fn into_report(self) -> BootstrapReport {
        self.report
    }

    //
    // ──────────────────────────────── RUNNERS ─────────────────────────────────
    //

    /// Full network bootstrap, stopping once validators have joined.
    pub async fn run_network(&mut self, artifacts: NetworkArtifacts) -> Result<(), Error> {
        log!(Topic::Bootstrap, Info, "bootstrap (network) start");

        let subnet_salt = self.plan.subnet_salt.unwrap_or_else(Salt::random);
        let cloud_salt = self.plan.cloud_salt.unwrap_or_else(Salt::random);

        self.upload_code(artifacts.pod).await?;
        self.deploy_subnet(CodeSource::Upload(artifacts.subnet), subnet_salt)
            .await?;
        self.deploy_cloud(CodeSource::Upload(artifacts.cloud), cloud_salt)
            .await?;
        self.register_validators().await?;
        self.set_boot_nodes().await?;
        self.join_validators().await?;

        log!(Topic::Bootstrap, Ok, "bootstrap (network) complete");

        Ok(())
    }

    /// Region and worker steps.
    pub async fn run_workers(&mut self) -> Result<(), Error> {
        log!(Topic::Bootstrap, Info, "bootstrap (workers) start");

        self.set_region().await?;
        self.register_workers().await?;
        self.mortgage_workers().await?;

        log!(Topic::Bootstrap, Ok, "bootstrap (workers) complete");

        Ok(())
    }

    //
    // ───────────────────────────────── STEPS ──────────────────────────────────
    //

    pub async fn upload_code(&mut self, pod: Vec<u8>) -> Result<CodeHandle, Error> {
        let step = BootstrapState::CodeUploaded;
        self.machine.check(step)?;

        let store = ArtifactStore::new(self.client.clone());
        let handle = store
            .upload(&self.signer, pod)
            .await
            .map_err(|err| Self::failed(step, None, err))?;

        self.report.pod_code = Some(handle);
        self.complete(step)?;

        Ok(handle)
    }

    pub async fn deploy_subnet(
        &mut self,
        code: CodeSource,
        salt: Salt,
    ) -> Result<DeployedAddress, Error> {
        let step = BootstrapState::SubnetDeployed;
        self.machine.check(step)?;

        let code_hash = match code {
            CodeSource::Uploaded(handle) => handle,
            CodeSource::Upload(bytes) => ArtifactStore::new(self.client.clone())
                .upload(&self.signer, bytes)
                .await
                .map_err(|err| Self::failed(step, None, err))?,
        };
        self.subnet_code = Some(code_hash);

        let deployer = ContractDeployer::new(self.client.clone());
        let outcome = deployer
            .deploy_subnet(CodeSource::Uploaded(code_hash), salt, &self.signer)
            .await
            .map_err(|err| Self::failed(step, None, err))?;
        self.report.subnet = Some(outcome.clone());

        let address = outcome
            .into_address(ContractKind::Subnet)
            .map_err(|err| Self::failed(step, None, err.into()))?;

        self.subnet = Some(SubnetContract::new(address, self.client.clone()));
        self.complete(step)?;

        Ok(address)
    }

    pub async fn deploy_cloud(
        &mut self,
        code: CodeSource,
        salt: Salt,
    ) -> Result<DeployedAddress, Error> {
        let step = BootstrapState::CloudDeployed;
        self.machine.check(step)?;

        let subnet = self.subnet()?.address();
        let pod_code = self
            .report
            .pod_code
            .ok_or(BootstrapError::Missing("pod code"))?;

        let mut deployer = ContractDeployer::new(self.client.clone());
        if let Some(code) = self.subnet_code {
            deployer = deployer.with_known_code(ContractKind::Subnet, code);
        }
        let outcome = deployer
            .deploy_cloud(code, subnet, pod_code, salt, &self.signer)
            .await
            .map_err(|err| Self::failed(step, Some(subnet), err))?;
        self.report.cloud = Some(outcome.clone());

        let address = outcome
            .into_address(ContractKind::Cloud)
            .map_err(|err| Self::failed(step, Some(subnet), err.into()))?;

        self.complete(step)?;

        Ok(address)
    }

    /// Register every planned validator; slot = position in the plan.
    pub async fn register_validators(&mut self) -> Result<Vec<RegisterOutcome>, Error> {
        let step = BootstrapState::ValidatorsRegistered;
        self.machine.check(step)?;

        let subnet = self.subnet()?.clone();
        let target = Some(subnet.address());
        let validators = self.plan.validators.clone();
        let mut outcomes = Vec::with_capacity(validators.len());

        for (expected, validator) in (0u64..).zip(validators.iter()) {
            let options = self.exec_options(true).await?;
            let outcome = register_validator(&subnet, &self.signer, validator, options)
                .await
                .map_err(|err| Self::failed(step, target, err))?;

            match &outcome {
                RegisterOutcome::Registered(slot) => {
                    let slot = *slot;
                    self.advance_nonce();
                    log!(
                        Topic::Validator,
                        Ok,
                        "secret_register: {} at slot {slot} ({})",
                        validator.name,
                        validator.endpoint
                    );
                    Self::expect_slot(step, target, expected, slot)?;
                }
                RegisterOutcome::SlotOccupied(slot) => {
                    let slot = *slot;
                    Self::expect_slot(step, target, expected, slot)?;
                    if !self.plan.skip_occupied {
                        let err = BootstrapError::SlotOccupied {
                            name: validator.name.clone(),
                            slot,
                        };
                        return Err(Self::failed(step, target, err.into()));
                    }
                    log!(
                        Topic::Validator,
                        Warn,
                        "secret_register: {} already at slot {slot}, skipped",
                        validator.name
                    );
                }
                RegisterOutcome::Rejected(reason) => {
                    let err = BootstrapError::RegistrationRejected {
                        name: validator.name.clone(),
                        reason: reason.clone(),
                    };
                    return Err(Self::failed(step, target, err.into()));
                }
            }

            self.report.validators.push(outcome.clone());
            outcomes.push(outcome);
        }

        self.complete(step)?;

        Ok(outcomes)
    }

    /// Overwrite the boot-node set with the planned slots.
    pub async fn set_boot_nodes(&mut self) -> Result<(), Error> {
        let step = BootstrapState::BootNodesSet;
        self.machine.check(step)?;

        let subnet = self.subnet()?.clone();
        let nodes = self.plan.boot_nodes.clone();
        let options = self.exec_options(true).await?;

        subnet
            .set_boot_nodes(&self.signer, &nodes, options)
            .await
            .map_err(|err| Self::failed(step, Some(subnet.address()), err))?;
        self.advance_nonce();

        let mut applied = nodes;
        applied.sort_unstable();
        applied.dedup();
        log!(Topic::Validator, Ok, "set_boot_nodes: {applied:?}");

        self.report.boot_nodes = applied;
        self.complete(step)
    }

    pub async fn join_validators(&mut self) -> Result<(), Error> {
        let step = BootstrapState::ValidatorsJoined;
        self.machine.check(step)?;

        let subnet = self.subnet()?.clone();
        let target = Some(subnet.address());
        let origin = self.signer.account;

        // slots already running or queued to join
        let mut active: HashSet<NodeId> = subnet
            .validators(&origin)
            .await
            .map_err(|err| Self::failed(step, target, err))?
            .into_iter()
            .map(|(id, _, _)| id)
            .collect();
        active.extend(
            subnet
                .pending_secrets(&origin)
                .await
                .map_err(|err| Self::failed(step, target, err))?
                .into_iter()
                .map(|(id, _)| id),
        );

        let mut joins = Vec::with_capacity(self.plan.joins.len());
        for id in self.plan.joins.clone() {
            if active.contains(&id) {
                log!(
                    Topic::Validator,
                    Warn,
                    "validator_join: slot {id} already active, skipped"
                );
            } else {
                joins.push(id);
            }
        }

        let last = joins.len().saturating_sub(1);
        for (i, id) in joins.into_iter().enumerate() {
            let options = self.exec_options(i == last).await?;
            subnet
                .validator_join(&self.signer, id, options)
                .await
                .map_err(|err| Self::failed(step, target, err))?;
            self.advance_nonce();

            log!(Topic::Validator, Ok, "validator_join: slot {id}");
            self.report.joined.push(id);
        }

        self.complete(step)
    }

    pub async fn set_region(&mut self) -> Result<(), Error> {
        let step = BootstrapState::RegionSet;
        self.machine.check(step)?;

        let subnet = self.subnet()?.clone();
        let region = self
            .plan
            .region
            .clone()
            .ok_or(BootstrapError::Missing("region"))?;
        let options = self.exec_options(true).await?;

        subnet
            .set_region(&self.signer, &region, options)
            .await
            .map_err(|err| Self::failed(step, Some(subnet.address()), err))?;
        self.advance_nonce();

        log!(Topic::Worker, Ok, "set_region: {region}");
        self.report.region = Some(region);
        self.complete(step)
    }

    pub async fn register_workers(&mut self) -> Result<Vec<RegisterOutcome>, Error> {
        let step = BootstrapState::WorkersRegistered;
        self.machine.check(step)?;

        let subnet = self.subnet()?.clone();
        let target = Some(subnet.address());
        let workers = self.plan.workers.clone();
        let mut outcomes = Vec::with_capacity(workers.len());

        for worker in &workers {
            let options = self.exec_options(true).await?;
            let outcome = register_worker(&subnet, &self.signer, worker, options)
                .await
                .map_err(|err| Self::failed(step, target, err))?;

            match &outcome {
                RegisterOutcome::Registered(id) => {
                    self.advance_nonce();
                    log!(
                        Topic::Worker,
                        Ok,
                        "worker_register: {} as worker {id} ({})",
                        worker.name,
                        worker.endpoint
                    );
                }
                RegisterOutcome::SlotOccupied(id) => {
                    if !self.plan.skip_occupied {
                        let err = BootstrapError::SlotOccupied {
                            name: worker.name.clone(),
                            slot: *id,
                        };
                        return Err(Self::failed(step, target, err.into()));
                    }
                    log!(
                        Topic::Worker,
                        Warn,
                        "worker_register: {} already worker {id}, skipped",
                        worker.name
                    );
                }
                RegisterOutcome::Rejected(reason) => {
                    let err = BootstrapError::RegistrationRejected {
                        name: worker.name.clone(),
                        reason: reason.clone(),
                    };
                    return Err(Self::failed(step, target, err.into()));
                }
            }

            self.report.workers.push(outcome.clone());
            outcomes.push(outcome);
        }

        self.complete(step)?;

        Ok(outcomes)
    }

    /// Mortgage freshly registered workers. Workers found already
    /// registered keep whatever mortgages they have.
    pub async fn mortgage_workers(&mut self) -> Result<Vec<(NodeId, u32)>, Error> {
        let step = BootstrapState::WorkersMortgaged;
        self.machine.check(step)?;

        let subnet = self.subnet()?.clone();
        let target = Some(subnet.address());
        let planned: Vec<_> = self
            .plan
            .workers
            .iter()
            .zip(self.report.workers.iter())
            .map(|(plan, outcome)| (plan.clone(), outcome.clone()))
            .collect();

        let mut mortgages = Vec::new();
        for (worker, outcome) in planned {
            let RegisterOutcome::Registered(worker_id) = outcome else {
                log!(
                    Topic::Worker,
                    Info,
                    "worker_mortgage: {} not newly registered, skipped",
                    worker.name
                );
                continue;
            };

            for terms in &worker.mortgages {
                let options = self.exec_options(true).await?;
                let mortgage_id = subnet
                    .worker_mortgage(&self.signer, worker_id, terms, options)
                    .await
                    .map_err(|err| Self::failed(step, target, err))?;
                self.advance_nonce();

                log!(
                    Topic::Worker,
                    Ok,
                    "worker_mortgage: worker {worker_id} mortgage {mortgage_id} (deposit {})",
                    terms.deposit
                );
                self.report.mortgages.push((worker_id, mortgage_id));
                mortgages.push((worker_id, mortgage_id));
            }
        }

        self.complete(step)?;

        Ok(mortgages)
    }

    //
    // ──────────────────────────────── HELPERS ─────────────────────────────────
    //

    fn subnet(&self) -> Result<&SubnetContract, BootstrapError> {
        self.subnet
            .as_ref()
            .ok_or(BootstrapError::Missing("subnet address"))
    }

    /// Options for the next write. `settle` forces a finality wait.
    async fn exec_options(&mut self, settle: bool) -> Result<ExecOptions, Error> {
        let sequencer = match self.sequencer {
            Some(seq) => seq,
            None => {
                let seq = TxSequencer::load(self.client.as_ref(), &self.signer.account).await?;
                self.sequencer = Some(seq);
                seq
            }
        };

        let base = if settle || self.wait_finality {
            ExecOptions::finalized()
        } else {
            ExecOptions::fire_and_forget()
        };

        Ok(sequencer.options(base))
    }

    fn advance_nonce(&mut self) {
        if let Some(seq) = self.sequencer.as_mut() {
            seq.advance();
        }
    }

    fn complete(&mut self, step: BootstrapState) -> Result<(), Error> {
        self.machine.advance(step)?;
        self.report.state = step;
        log!(Topic::Bootstrap, Info, "step {} done", step.step_name());

        Ok(())
    }

    fn expect_slot(
        step: BootstrapState,
        target: Option<DeployedAddress>,
        expected: NodeId,
        got: NodeId,
    ) -> Result<(), Error> {
        if expected == got {
            Ok(())
        } else {
            let err = BootstrapError::SlotMismatch { expected, got };
            Err(Self::failed(step, target, err.into()))
        }
    }

    fn failed(step: BootstrapState, target: Option<DeployedAddress>, source: Error) -> Error {
        log!(
            Topic::Bootstrap,
            Error,
            "step {} failed: {source}",
            step.step_name()
        );

        BootstrapError::StepFailed {
            step,
            target,
            source: Box::new(source),
        }
        .into()
    }
}
