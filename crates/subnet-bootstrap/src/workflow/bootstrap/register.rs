//! Registration helpers that turn a duplicate-identity revert into a typed
//! `SlotOccupied` outcome.

use crate::{
    Error,
    dto::{
        outcome::RegisterOutcome,
        revert::{Revert, SubnetError},
    },
    infra::Signer,
    ops::contract::{ExecOptions, SubnetContract},
    workflow::bootstrap::plan::{ValidatorPlan, WorkerPlan},
};

/// Register one validator. Transport failures stay errors; contract
/// refusals become outcomes.
pub async fn register_validator(
    subnet: &SubnetContract,
    signer: &Signer,
    plan: &ValidatorPlan,
    options: ExecOptions,
) -> Result<RegisterOutcome, Error> {
    let result = subnet
        .secret_register(
            signer,
            &plan.name,
            plan.validator_id,
            plan.p2p_id,
            &plan.endpoint,
            options,
        )
        .await;

    match result {
        Ok(slot) => Ok(RegisterOutcome::Registered(slot)),
        Err(err) => match revert_of(&err) {
            Some(Revert::Subnet(SubnetError::SecretNodeAlreadyExists)) => {
                let existing = subnet.secrets(&signer.account).await?;
                let slot = existing
                    .iter()
                    .find(|(_, record)| record.p2p_id == plan.p2p_id)
                    .map(|(slot, _)| *slot);

                match slot {
                    Some(slot) => Ok(RegisterOutcome::SlotOccupied(slot)),
                    None => Ok(RegisterOutcome::Rejected(err.to_string())),
                }
            }
            Some(_) => Ok(RegisterOutcome::Rejected(err.to_string())),
            None => Err(err),
        },
    }
}

/// Register one worker, mapping a known p2p identity to its existing id.
pub async fn register_worker(
    subnet: &SubnetContract,
    signer: &Signer,
    plan: &WorkerPlan,
    options: ExecOptions,
) -> Result<RegisterOutcome, Error> {
    let result = subnet
        .worker_register(
            signer,
            &plan.name,
            plan.p2p_id,
            &plan.endpoint,
            plan.level,
            plan.region_id,
            options,
        )
        .await;

    match result {
        Ok(id) => Ok(RegisterOutcome::Registered(id)),
        Err(err) => match revert_of(&err) {
            Some(Revert::Subnet(SubnetError::WorkerAlreadyExists)) => {
                match subnet.mint_worker(&signer.account, plan.p2p_id).await? {
                    Some((id, _)) => Ok(RegisterOutcome::SlotOccupied(id)),
                    None => Ok(RegisterOutcome::Rejected(err.to_string())),
                }
            }
            Some(_) => Ok(RegisterOutcome::Rejected(err.to_string())),
            None => Err(err),
        },
    }
}

const fn revert_of(err: &Error) -> Option<&Revert> {
    match err {
        Error::Call(call) => call.revert(),
        _ => None,
    }
}

