use crate::{
    Error, ErrorClass,
    dto::{outcome::DeployOutcome, revert::Revert},
    ids::{CodeHandle, ContractKind, DeployedAddress, Salt},
    infra::{CallData, ChainClient, ChainError, InstantiateRequest, Signer},
    log,
    log::Topic,
    ops::{address::derive_address, artifact::ArtifactStore},
};
use candid::utils::ArgumentEncoder;
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// DeployError
///

#[derive(Debug, ThisError)]
pub enum DeployError {
    #[error("chain placed {kind} at {actual}, expected {expected}")]
    AddressMismatch {
        kind: ContractKind,
        expected: DeployedAddress,
        actual: DeployedAddress,
    },

    #[error("{kind} dependency has no instance at {address}")]
    MissingDependency {
        kind: ContractKind,
        address: DeployedAddress,
    },

    #[error("{kind} deployment rejected: {reason}")]
    Rejected { kind: ContractKind, reason: String },

    #[error("{kind} dependency at {address} runs code {found}, expected {expected}")]
    WrongDependency {
        kind: ContractKind,
        address: DeployedAddress,
        expected: CodeHandle,
        found: CodeHandle,
    },
}

impl DeployError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::AddressMismatch { .. } => ErrorClass::Invariant,
            Self::MissingDependency { .. } => ErrorClass::Dependency,
            Self::Rejected { .. } => ErrorClass::Rejection,
            Self::WrongDependency { .. } => ErrorClass::Dependency,
        }
    }
}

impl DeployOutcome {
    /// Collapse the outcome to an address, turning a rejection into an error.
    pub fn into_address(self, kind: ContractKind) -> Result<DeployedAddress, DeployError> {
        match self {
            Self::Deployed(addr) | Self::AlreadyDeployed(addr) => Ok(addr),
            Self::Rejected(reason) => Err(DeployError::Rejected { kind, reason }),
        }
    }
}

///
/// CodeSource
///

#[derive(Clone, Debug)]
pub enum CodeSource {
    Uploaded(CodeHandle),
    Upload(Vec<u8>),
}

///
/// Constructor
///

#[derive(Clone, Debug)]
pub struct Constructor {
    data: CallData,
}

impl Constructor {
    pub fn new<A: ArgumentEncoder>(method: &str, args: A) -> Result<Self, Error> {
        Ok(Self {
            data: CallData::encode(method, args)?,
        })
    }

    /// The conventional zero-argument `new` constructor.
    pub fn default_new() -> Result<Self, Error> {
        Self::new("new", ())
    }

    /// Bytes hashed into the deployment address.
    #[must_use]
    pub fn input(&self) -> Vec<u8> {
        self.data.to_bytes()
    }
}

///
/// ContractDeployer
///

#[derive(Clone)]
pub struct ContractDeployer {
    client: Arc<dyn ChainClient>,
    known_code: Vec<(ContractKind, CodeHandle)>,
}

impl ContractDeployer {
    #[must_use]
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self {
            client,
            known_code: Vec::new(),
        }
    }

    /// Record the code a dependency of `kind` must run.
    #[must_use]
    pub fn with_known_code(mut self, kind: ContractKind, code: CodeHandle) -> Self {
        self.known_code.retain(|(k, _)| *k != kind);
        self.known_code.push((kind, code));
        self
    }

    fn known_code(&self, kind: ContractKind) -> Option<CodeHandle> {
        self.known_code
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, code)| *code)
    }

    /// Address `signer` would deploy `ctor` on `code` with `salt`.
    #[must_use]
    pub fn predict(
        signer: &Signer,
        code: &CodeHandle,
        ctor: &Constructor,
        salt: &Salt,
    ) -> DeployedAddress {
        derive_address(&signer.account, code, &ctor.input(), salt)
    }

    /// Deploy an instance, or report the one already living at the derived
    /// address. Safe to repeat with identical inputs.
    pub async fn deploy(
        &self,
        kind: ContractKind,
        code: CodeSource,
        ctor: &Constructor,
        salt: Salt,
        signer: &Signer,
    ) -> Result<DeployOutcome, Error> {
        let code_hash = match code {
            CodeSource::Uploaded(handle) => handle,
            CodeSource::Upload(bytes) => {
                ArtifactStore::new(self.client.clone())
                    .upload(signer, bytes)
                    .await?
            }
        };

        let expected = Self::predict(signer, &code_hash, ctor, &salt);
        if self.client.contract_info(&expected).await?.is_some() {
            log!(Topic::Deploy, Info, "deploy: {kind} already at {expected}");

            return Ok(DeployOutcome::AlreadyDeployed(expected));
        }

        let request = InstantiateRequest {
            code_hash,
            ctor: ctor.data.clone(),
            salt,
            value: 0,
        };

        match self.client.instantiate(signer, request).await {
            Ok(result) if result.address != expected => Err(DeployError::AddressMismatch {
                kind,
                expected,
                actual: result.address,
            }
            .into()),
            Ok(result) => {
                log!(
                    Topic::Deploy,
                    Ok,
                    "deploy: {kind} at {expected} (block {})",
                    result.block
                );

                Ok(DeployOutcome::Deployed(expected))
            }
            Err(ChainError::Rejected(reason)) => {
                log!(Topic::Deploy, Warn, "deploy: {kind} rejected: {reason}");

                Ok(DeployOutcome::Rejected(reason))
            }
            Err(ChainError::Reverted(data)) => {
                let reason = Revert::decode(kind, &data).to_string();
                log!(Topic::Deploy, Warn, "deploy: {kind} constructor reverted: {reason}");

                Ok(DeployOutcome::Rejected(reason))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deploy the Subnet contract with its zero-argument constructor.
    pub async fn deploy_subnet(
        &self,
        code: CodeSource,
        salt: Salt,
        signer: &Signer,
    ) -> Result<DeployOutcome, Error> {
        let ctor = Constructor::default_new()?;

        self.deploy(ContractKind::Subnet, code, &ctor, salt, signer)
            .await
    }

    /// Deploy the Cloud contract bound to a live Subnet and the Pod code.
    /// With known Subnet code the dependency's code hash must match it;
    /// otherwise only its presence is checked and the constructor rejects
    /// other kinds.
    pub async fn deploy_cloud(
        &self,
        code: CodeSource,
        subnet: DeployedAddress,
        pod_code: CodeHandle,
        salt: Salt,
        signer: &Signer,
    ) -> Result<DeployOutcome, Error> {
        let info = self.client.contract_info(&subnet).await?.ok_or(
            DeployError::MissingDependency {
                kind: ContractKind::Subnet,
                address: subnet,
            },
        )?;

        if let Some(expected) = self.known_code(ContractKind::Subnet)
            && info.code_hash != expected
        {
            return Err(DeployError::WrongDependency {
                kind: ContractKind::Subnet,
                address: subnet,
                expected,
                found: info.code_hash,
            }
            .into());
        }

        let ctor = Constructor::new("new", (subnet, pod_code))?;

        self.deploy(ContractKind::Cloud, code, &ctor, salt, signer)
            .await
    }
}

///
/// TESTS
///
