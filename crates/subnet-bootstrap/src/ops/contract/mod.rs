//!
//! Typed contract proxies.
//!
//! `exec` signs a state-changing call; it always dry-runs first so reverts
//! surface before anything is paid for, and the dry-run gas becomes the
//! submitted gas limit. `query` is the dry run alone and never mutates.
//!

mod cloud;
mod subnet;

pub use cloud::CloudContract;
pub use subnet::SubnetContract;

use crate::{
    Error, ErrorClass,
    dto::revert::Revert,
    ids::{AccountId, ContractKind, DeployedAddress},
    infra::{
        CallData, CallRequest, CallResult, ChainClient, ChainError, ExecReceipt, GasEstimate,
        Signer, SubmitOptions,
    },
    log,
    log::Topic,
};
use candid::{CandidType, utils::ArgumentEncoder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error as ThisError;

///
/// CallError
///

#[derive(Debug, ThisError)]
pub enum CallError {
    #[error("{contract}.{method} returned undecodable data: {reason}")]
    Decode {
        contract: ContractKind,
        method: String,
        reason: String,
    },

    #[error("{contract}.{method} at {address} reverted: {reason}")]
    Reverted {
        contract: ContractKind,
        address: DeployedAddress,
        method: String,
        reason: Revert,
    },
}

impl CallError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Decode { .. } => ErrorClass::Invariant,
            Self::Reverted { .. } => ErrorClass::Rejection,
        }
    }

    /// Decoded revert reason, if this is a revert.
    #[must_use]
    pub const fn revert(&self) -> Option<&Revert> {
        match self {
            Self::Reverted { reason, .. } => Some(reason),
            Self::Decode { .. } => None,
        }
    }
}

///
/// ExecOptions
///

#[derive(Clone, Copy, Debug)]
pub struct ExecOptions {
    pub pay_amount: u128,
    pub wait_finality: bool,
    pub nonce: Option<u64>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self::finalized()
    }
}

impl ExecOptions {
    #[must_use]
    pub const fn finalized() -> Self {
        Self {
            pay_amount: 0,
            wait_finality: true,
            nonce: None,
        }
    }

    #[must_use]
    pub const fn fire_and_forget() -> Self {
        Self {
            pay_amount: 0,
            wait_finality: false,
            nonce: None,
        }
    }

    #[must_use]
    pub const fn with_pay_amount(mut self, amount: u128) -> Self {
        self.pay_amount = amount;
        self
    }

    #[must_use]
    pub const fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }
}

///
/// ContractHandle
///

#[derive(Clone)]
pub struct ContractHandle {
    kind: ContractKind,
    address: DeployedAddress,
    client: Arc<dyn ChainClient>,
}

impl ContractHandle {
    #[must_use]
    pub fn new(kind: ContractKind, address: DeployedAddress, client: Arc<dyn ChainClient>) -> Self {
        Self {
            kind,
            address,
            client,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ContractKind {
        self.kind
    }

    #[must_use]
    pub const fn address(&self) -> DeployedAddress {
        self.address
    }

    /// Simulated call; returns the decoded result and the gas it would use.
    pub async fn query<A, R>(
        &self,
        method: &str,
        args: A,
        origin: &AccountId,
        pay_amount: u128,
    ) -> Result<(R, GasEstimate), Error>
    where
        A: ArgumentEncoder,
        R: CandidType + DeserializeOwned,
    {
        let request = self.request(origin, method, args, pay_amount)?;
        let (output, gas) = self.simulate(&request).await?;

        Ok((self.decode(method, &output)?, gas))
    }

    /// Signed call; the result value is discarded.
    pub async fn exec<A>(
        &self,
        signer: &Signer,
        method: &str,
        args: A,
        options: ExecOptions,
    ) -> Result<ExecReceipt, Error>
    where
        A: ArgumentEncoder,
    {
        let (receipt, _) = self.exec_raw(signer, method, args, options).await?;

        Ok(receipt)
    }

    /// Signed call that also decodes the method's return value. The value
    /// comes from the finalized receipt when available, otherwise from the
    /// dry run.
    pub async fn exec_returning<A, R>(
        &self,
        signer: &Signer,
        method: &str,
        args: A,
        options: ExecOptions,
    ) -> Result<(R, ExecReceipt), Error>
    where
        A: ArgumentEncoder,
        R: CandidType + DeserializeOwned,
    {
        let (receipt, predicted) = self.exec_raw(signer, method, args, options).await?;
        let output = receipt.output.as_deref().unwrap_or(&predicted);
        let value = self.decode(method, output)?;

        Ok((value, receipt))
    }

    async fn exec_raw<A>(
        &self,
        signer: &Signer,
        method: &str,
        args: A,
        options: ExecOptions,
    ) -> Result<(ExecReceipt, Vec<u8>), Error>
    where
        A: ArgumentEncoder,
    {
        let mut request = self.request(&signer.account, method, args, options.pay_amount)?;
        let (predicted, gas) = self.simulate(&request).await?;
        request.gas_limit = Some(gas);

        let submit = SubmitOptions {
            nonce: options.nonce,
            wait_finality: options.wait_finality,
        };
        let receipt = self
            .client
            .submit(signer, request, submit)
            .await
            .map_err(|err| match err {
                ChainError::Reverted(data) => self.reverted(method, &data),
                other => Error::from(other),
            })?;

        log!(
            Topic::Call,
            Debug,
            "exec: {}.{method} nonce={} block={:?}",
            self.kind,
            receipt.nonce,
            receipt.block
        );

        Ok((receipt, predicted))
    }

    fn request<A: ArgumentEncoder>(
        &self,
        origin: &AccountId,
        method: &str,
        args: A,
        value: u128,
    ) -> Result<CallRequest, Error> {
        Ok(CallRequest {
            origin: *origin,
            dest: self.address,
            data: CallData::encode(method, args)?,
            value,
            gas_limit: None,
        })
    }

    async fn simulate(&self, request: &CallRequest) -> Result<(Vec<u8>, GasEstimate), Error> {
        let dry = self.client.dry_run(request).await?;

        match dry.result {
            CallResult::Returned(output) => Ok((output, dry.gas)),
            CallResult::Reverted(data) => Err(self.reverted(&request.data.method, &data)),
        }
    }

    fn reverted(&self, method: &str, data: &[u8]) -> Error {
        CallError::Reverted {
            contract: self.kind,
            address: self.address,
            method: method.to_string(),
            reason: Revert::decode(self.kind, data),
        }
        .into()
    }

    fn decode<R>(&self, method: &str, output: &[u8]) -> Result<R, Error>
    where
        R: CandidType + DeserializeOwned,
    {
        candid::decode_one(output).map_err(|err| {
            CallError::Decode {
                contract: self.kind,
                method: method.to_string(),
                reason: err.to_string(),
            }
            .into()
        })
    }
}

///
/// TESTS
///
