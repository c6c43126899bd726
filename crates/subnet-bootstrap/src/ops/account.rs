use crate::{
    Error,
    dto::outcome::MappingOutcome,
    infra::{ChainClient, RuntimeCall, Signer, SubmitOptions},
    log,
    log::Topic,
};
use std::sync::Arc;

///
/// AccountMapper
///
/// Keeps the signer's fixed-width address resolvable to its native account.
/// An existing mapping is a skip, never an error.
///

#[derive(Clone)]
pub struct AccountMapper {
    client: Arc<dyn ChainClient>,
}

impl AccountMapper {
    #[must_use]
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self { client }
    }

    pub async fn ensure_mapped(
        &self,
        signer: &Signer,
        wait_finality: bool,
    ) -> Result<MappingOutcome, Error> {
        let address = signer.address();

        if let Some(original) = self.client.original_account(&address).await? {
            if original == signer.account {
                log!(Topic::Account, Info, "map_account: {address} already mapped");
            } else {
                log!(
                    Topic::Account,
                    Warn,
                    "map_account: {address} mapped to {original}, not {}",
                    signer.account
                );
            }

            return Ok(MappingOutcome::AlreadyMapped);
        }

        let options = SubmitOptions {
            nonce: None,
            wait_finality,
        };
        let receipt = self
            .client
            .submit_runtime(signer, RuntimeCall::MapAccount, options)
            .await?;

        log!(
            Topic::Account,
            Ok,
            "map_account: {address} -> {} (nonce {})",
            signer.account,
            receipt.nonce
        );

        Ok(MappingOutcome::Mapped)
    }
}
