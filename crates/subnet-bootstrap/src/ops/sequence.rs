use crate::{
    Error,
    ids::AccountId,
    infra::ChainClient,
    ops::contract::ExecOptions,
};

///
/// TxSequencer
///
/// Local nonce counter for a run of execs from one account. The nonce is
/// read once; each successful submission advances it.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TxSequencer {
    next: u64,
}

impl TxSequencer {
    pub async fn load(client: &dyn ChainClient, account: &AccountId) -> Result<Self, Error> {
        let next = client.account_nonce(account).await?;

        Ok(Self { next })
    }

    #[must_use]
    pub const fn starting_at(next: u64) -> Self {
        Self { next }
    }

    #[must_use]
    pub const fn peek(&self) -> u64 {
        self.next
    }

    /// `base` with the pending nonce filled in.
    #[must_use]
    pub const fn options(&self, base: ExecOptions) -> ExecOptions {
        base.with_nonce(self.next)
    }

    /// Mark the pending nonce as used.
    pub const fn advance(&mut self) {
        self.next += 1;
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_only_moves_on_advance() {
        let mut seq = TxSequencer::starting_at(7);

        assert_eq!(seq.options(ExecOptions::finalized()).nonce, Some(7));
        assert_eq!(seq.options(ExecOptions::finalized()).nonce, Some(7));

        seq.advance();
        assert_eq!(seq.peek(), 8);
    }
}
