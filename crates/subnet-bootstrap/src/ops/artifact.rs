use crate::{
    Error, ErrorClass,
    ids::CodeHandle,
    infra::{ChainClient, ChainError, Signer},
    log,
    log::Topic,
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error as ThisError;

///
/// ArtifactError
///

#[derive(Debug, ThisError)]
pub enum ArtifactError {
    #[error("artifact {} is empty", path.display())]
    Empty { path: PathBuf },

    #[error("artifact {} unavailable: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("code upload rejected: {reason}")]
    UploadRejected { reason: String },
}

impl ArtifactError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Empty { .. } | Self::Unavailable { .. } => ErrorClass::Artifact,
            Self::UploadRejected { .. } => ErrorClass::Rejection,
        }
    }
}

/// Read a compiled contract blob from disk.
pub fn read_artifact(path: impl AsRef<Path>) -> Result<Vec<u8>, ArtifactError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.is_empty() {
        return Err(ArtifactError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(bytes)
}

///
/// ArtifactStore
/// Uploads code blobs and hands back their content handle.
///

#[derive(Clone)]
pub struct ArtifactStore {
    client: Arc<dyn ChainClient>,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self { client }
    }

    /// Upload `bytes`; re-uploading identical bytes returns the same handle.
    pub async fn upload(&self, signer: &Signer, bytes: Vec<u8>) -> Result<CodeHandle, Error> {
        #[allow(clippy::cast_precision_loss)]
        let size_kb = bytes.len() as f64 / 1_000.0;

        let handle = self
            .client
            .upload_code(signer, bytes)
            .await
            .map_err(|err| match err {
                ChainError::Rejected(reason) => ArtifactError::UploadRejected { reason }.into(),
                ChainError::Reverted(data) => ArtifactError::UploadRejected {
                    reason: format!("0x{}", hex::encode(data)),
                }
                .into(),
                other => Error::from(other),
            })?;

        log!(Topic::Code, Ok, "upload_code: {handle} ({size_kb:.2} KB)");

        Ok(handle)
    }

    pub async fn load_and_upload(
        &self,
        signer: &Signer,
        path: impl AsRef<Path>,
    ) -> Result<CodeHandle, Error> {
        let path = path.as_ref();
        let bytes = read_artifact(path)?;
        log!(Topic::Code, Debug, "read_artifact: {}", path.display());

        self.upload(signer, bytes).await
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_unavailable() {
        let err = read_artifact("/nonexistent/pod.polkavm").unwrap_err();

        assert!(matches!(err, ArtifactError::Unavailable { .. }));
        assert_eq!(err.class(), ErrorClass::Artifact);
    }

    #[test]
    fn empty_file_is_rejected_locally() {
        let path = std::env::temp_dir().join(format!("empty-artifact-{}", std::process::id()));
        std::fs::write(&path, b"").expect("write temp file");

        let err = read_artifact(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);

        assert!(matches!(err, ArtifactError::Empty { .. }));
    }
}
