use crate::{Error, api::Session, dto::outcome::MappingOutcome, ops::account::AccountMapper};

/// Map the session signer's address to its native account unless already
/// mapped.
pub async fn ensure_account_mapping(session: &Session) -> Result<MappingOutcome, Error> {
    AccountMapper::new(session.client())
        .ensure_mapped(session.signer(), session.config().chain.wait_finality)
        .await
}
