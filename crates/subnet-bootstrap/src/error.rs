use crate::{
    config::ConfigError,
    ids::IdError,
    infra::ChainError,
    ops::{artifact::ArtifactError, contract::CallError, deploy::DeployError, upgrade::UpgradeError},
    workflow::bootstrap::BootstrapError,
};
use derive_more::Display;
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error. Every module error converts into this type so callers
/// can propagate with `?` and branch on [`Error::class`] instead of matching
/// message text.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Call(#[from] CallError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("codec error: {0}")]
    Codec(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Id(#[from] IdError),

    #[error(transparent)]
    Upgrade(#[from] UpgradeError),
}

impl Error {
    /// Classify this error for operator handling.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Artifact(err) => err.class(),
            Self::Bootstrap(err) => err.class(),
            Self::Call(err) => err.class(),
            Self::Chain(err) => err.class(),
            Self::Codec(_) => ErrorClass::Invariant,
            Self::Config(_) | Self::Id(_) => ErrorClass::Config,
            Self::Deploy(err) => err.class(),
            Self::Upgrade(err) => err.class(),
        }
    }

    /// Only transport failures may be retried with unchanged inputs.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transport
    }
}

impl From<candid::Error> for Error {
    fn from(err: candid::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum ErrorClass {
    AlreadyExists,
    Artifact,
    Config,
    Dependency,
    Invariant,
    Rejection,
    Transport,
}

///
/// TESTS
///
