use crate::{
    Error, ErrorClass,
    dto::outcome::UpgradeOutcome,
    ids::{CodeHandle, ContractKind, DeployedAddress},
    infra::{ChainClient, ChainError, Signer},
    log,
    log::Topic,
    ops::{
        artifact::ArtifactStore,
        contract::{CallError, ContractHandle, ExecOptions},
        deploy::CodeSource,
    },
};
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// UpgradeError
///

#[derive(Debug, ThisError)]
pub enum UpgradeError {
    #[error("{kind} at {address} still runs {actual} after set_code({expected})")]
    CodeNotApplied {
        kind: ContractKind,
        address: DeployedAddress,
        expected: CodeHandle,
        actual: CodeHandle,
    },

    #[error("no {kind} instance at {address}")]
    NotDeployed {
        kind: ContractKind,
        address: DeployedAddress,
    },

    #[error("{kind} upgrade at {address} rejected: {reason}")]
    Rejected {
        kind: ContractKind,
        address: DeployedAddress,
        reason: String,
    },
}

impl UpgradeError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::CodeNotApplied { .. } => ErrorClass::Invariant,
            Self::NotDeployed { .. } => ErrorClass::Dependency,
            Self::Rejected { .. } => ErrorClass::Rejection,
        }
    }
}

///
/// ContractUpgrader
///
/// Live code swap through the contract's own `set_code`. Address and
/// storage stay in place; authority and storage compatibility are checked
/// by the chain.
///

#[derive(Clone)]
pub struct ContractUpgrader {
    client: Arc<dyn ChainClient>,
}

impl ContractUpgrader {
    #[must_use]
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self { client }
    }

    /// Swap the code behind `address`. No-op when it already runs the
    /// target code.
    pub async fn upgrade(
        &self,
        kind: ContractKind,
        address: DeployedAddress,
        code: CodeSource,
        signer: &Signer,
    ) -> Result<UpgradeOutcome, Error> {
        let Some(info) = self.client.contract_info(&address).await? else {
            return Err(UpgradeError::NotDeployed { kind, address }.into());
        };

        let code_hash = match code {
            CodeSource::Uploaded(handle) => handle,
            CodeSource::Upload(bytes) => {
                ArtifactStore::new(self.client.clone())
                    .upload(signer, bytes)
                    .await?
            }
        };

        if info.code_hash == code_hash {
            log!(
                Topic::Upgrade,
                Info,
                "upgrade: {kind} at {address} already running {code_hash}"
            );

            return Ok(UpgradeOutcome::AlreadyCurrent);
        }

        let handle = ContractHandle::new(kind, address, self.client.clone());
        handle
            .exec(signer, "set_code", (code_hash,), ExecOptions::finalized())
            .await
            .map_err(|err| match err {
                Error::Call(CallError::Reverted { reason, .. }) => UpgradeError::Rejected {
                    kind,
                    address,
                    reason: reason.to_string(),
                }
                .into(),
                Error::Chain(ChainError::Rejected(reason)) => UpgradeError::Rejected {
                    kind,
                    address,
                    reason,
                }
                .into(),
                other => other,
            })?;

        let actual = self
            .client
            .contract_info(&address)
            .await?
            .map(|info| info.code_hash)
            .ok_or(UpgradeError::NotDeployed { kind, address })?;
        if actual != code_hash {
            return Err(UpgradeError::CodeNotApplied {
                kind,
                address,
                expected: code_hash,
                actual,
            }
            .into());
        }

        log!(
            Topic::Upgrade,
            Ok,
            "upgrade: {kind} at {address} now runs {code_hash}"
        );

        Ok(UpgradeOutcome::Upgraded)
    }
}
