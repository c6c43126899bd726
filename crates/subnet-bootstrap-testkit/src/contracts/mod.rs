//!
//! Contract semantics run by the simulated chain.
//!
//! Calls are dispatched by method name over candid-encoded arguments. A
//! successful call returns the candid-encoded value; a failing call returns
//! the revert payload, normally a candid-encoded contract error.
//!

mod cloud;
mod subnet;

pub use cloud::CloudState;
pub use subnet::SubnetState;

use candid::{CandidType, utils::ArgumentDecoder};
use subnet_bootstrap::{
    dto::revert::{CloudError, SubnetError},
    ids::{CodeHandle, ContractKind, DeployedAddress},
};

pub type Outcome = Result<Vec<u8>, Vec<u8>>;

///
/// Ctx
/// Execution context of one call.
///

#[derive(Clone, Copy, Debug)]
pub struct Ctx {
    pub caller: DeployedAddress,
    pub block: u64,
}

///
/// ContractState
///

#[derive(Clone, Debug)]
pub enum ContractState {
    Cloud(CloudState),
    Pod,
    Subnet(SubnetState),
}

impl ContractState {
    /// Run the constructor of `kind`. `lookup` resolves live contracts.
    pub fn construct(
        kind: ContractKind,
        ctx: &Ctx,
        method: &str,
        args: &[u8],
        lookup: impl Fn(&DeployedAddress) -> Option<ContractKind>,
    ) -> Result<Self, Vec<u8>> {
        if method != "new" {
            return Err(raw(format!("no constructor named '{method}'")));
        }

        match kind {
            ContractKind::Pod => Ok(Self::Pod),
            ContractKind::Subnet => {
                decode::<()>(args)?;
                Ok(Self::Subnet(SubnetState::new(ctx.caller)))
            }
            ContractKind::Cloud => {
                let (subnet, pod_code) = decode::<(DeployedAddress, CodeHandle)>(args)?;
                if lookup(&subnet) != Some(ContractKind::Subnet) {
                    return Err(revert(CloudError::InvalidSubnetAddress));
                }

                Ok(Self::Cloud(CloudState::new(ctx.caller, subnet, pod_code)))
            }
        }
    }

    /// Governance address allowed to replace the code.
    pub const fn gov(&self) -> Option<DeployedAddress> {
        match self {
            Self::Cloud(state) => Some(state.gov),
            Self::Pod => None,
            Self::Subnet(state) => Some(state.gov),
        }
    }

    pub fn call(&mut self, ctx: &Ctx, method: &str, args: &[u8]) -> Outcome {
        match self {
            Self::Cloud(state) => state.call(ctx, method, args),
            Self::Pod => Err(raw(format!("pod has no method '{method}'"))),
            Self::Subnet(state) => state.call(ctx, method, args),
        }
    }

    /// Revert payload for a refused `set_code`.
    pub fn set_code_failed(&self) -> Vec<u8> {
        match self {
            Self::Cloud(_) => revert(CloudError::SetCodeFailed),
            Self::Pod => raw("set_code unsupported".to_string()),
            Self::Subnet(_) => revert(SubnetError::SetCodeFailed),
        }
    }

    /// Revert payload for a non-governance caller.
    pub fn not_gov(&self) -> Vec<u8> {
        match self {
            Self::Cloud(_) => revert(CloudError::MustCallByGovContract),
            Self::Pod => raw("set_code unsupported".to_string()),
            Self::Subnet(_) => revert(SubnetError::MustCallByGovContract),
        }
    }
}

// ───── HELPERS ─────

fn decode<T>(args: &[u8]) -> Result<T, Vec<u8>>
where
    T: for<'a> ArgumentDecoder<'a>,
{
    candid::decode_args(args).map_err(|e| raw(format!("bad arguments: {e}")))
}

fn reply<T: CandidType>(value: T) -> Outcome {
    candid::encode_one(value).map_err(|e| raw(format!("bad reply: {e}")))
}

fn revert<E: CandidType>(err: E) -> Vec<u8> {
    candid::encode_one(err).unwrap_or_else(|e| raw(format!("bad revert: {e}")))
}

fn raw(message: String) -> Vec<u8> {
    message.into_bytes()
}

/// Newest-first slice of an ordered map, starting at `start` inclusive.
fn desc_page<T: Clone>(
    entries: &std::collections::BTreeMap<u64, T>,
    start: Option<u64>,
    size: u64,
) -> Vec<(u64, T)> {
    let upper = start.unwrap_or(u64::MAX);
    let take = usize::try_from(size).unwrap_or(usize::MAX);

    entries
        .range(..=upper)
        .rev()
        .take(take)
        .map(|(id, value)| (*id, value.clone()))
        .collect()
}
