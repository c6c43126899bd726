use crate::workflow::bootstrap::BootstrapError;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// BootstrapState
///
/// Forward-only progress of a subnet bootstrap. Declaration order is the
/// only legal order.
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum BootstrapState {
    #[default]
    Idle,
    CodeUploaded,
    SubnetDeployed,
    CloudDeployed,
    ValidatorsRegistered,
    BootNodesSet,
    ValidatorsJoined,
    RegionSet,
    WorkersRegistered,
    WorkersMortgaged,
}

impl BootstrapState {
    pub const ALL: [Self; 10] = [
        Self::Idle,
        Self::CodeUploaded,
        Self::SubnetDeployed,
        Self::CloudDeployed,
        Self::ValidatorsRegistered,
        Self::BootNodesSet,
        Self::ValidatorsJoined,
        Self::RegionSet,
        Self::WorkersRegistered,
        Self::WorkersMortgaged,
    ];

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::CodeUploaded),
            Self::CodeUploaded => Some(Self::SubnetDeployed),
            Self::SubnetDeployed => Some(Self::CloudDeployed),
            Self::CloudDeployed => Some(Self::ValidatorsRegistered),
            Self::ValidatorsRegistered => Some(Self::BootNodesSet),
            Self::BootNodesSet => Some(Self::ValidatorsJoined),
            Self::ValidatorsJoined => Some(Self::RegionSet),
            Self::RegionSet => Some(Self::WorkersRegistered),
            Self::WorkersRegistered => Some(Self::WorkersMortgaged),
            Self::WorkersMortgaged => None,
        }
    }

    /// Name of the step that reaches this state.
    #[must_use]
    pub const fn step_name(self) -> &'static str {
        match self {
            Self::Idle => "start",
            Self::CodeUploaded => "upload_code",
            Self::SubnetDeployed => "deploy_subnet",
            Self::CloudDeployed => "deploy_cloud",
            Self::ValidatorsRegistered => "register_validators",
            Self::BootNodesSet => "set_boot_nodes",
            Self::ValidatorsJoined => "join_validators",
            Self::RegionSet => "set_region",
            Self::WorkersRegistered => "register_workers",
            Self::WorkersMortgaged => "mortgage_workers",
        }
    }
}

///
/// BootstrapMachine
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BootstrapMachine {
    state: BootstrapState,
}

impl BootstrapMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: BootstrapState::Idle,
        }
    }

    /// Resume at a state reached by an earlier run.
    #[must_use]
    pub const fn attach(state: BootstrapState) -> Self {
        Self { state }
    }

    #[must_use]
    pub const fn state(&self) -> BootstrapState {
        self.state
    }

    /// Check that `to` is the immediate successor without moving.
    pub fn check(&self, to: BootstrapState) -> Result<(), BootstrapError> {
        if self.state.next() == Some(to) {
            Ok(())
        } else {
            Err(BootstrapError::OutOfOrder {
                from: self.state,
                to,
            })
        }
    }

    pub fn advance(&mut self, to: BootstrapState) -> Result<(), BootstrapError> {
        self.check(to)?;
        self.state = to;

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_every_state_in_order() {
        let mut machine = BootstrapMachine::new();

        for to in BootstrapState::ALL.into_iter().skip(1) {
            machine.advance(to).expect("forward transition");
        }

        assert_eq!(machine.state(), BootstrapState::WorkersMortgaged);
        assert_eq!(machine.state().next(), None);
    }

    #[test]
    fn skipping_a_state_is_rejected() {
        let mut machine = BootstrapMachine::new();
        machine
            .advance(BootstrapState::CodeUploaded)
            .expect("first step");

        let err = machine
            .advance(BootstrapState::CloudDeployed)
            .unwrap_err();

        assert!(matches!(
            err,
            BootstrapError::OutOfOrder {
                from: BootstrapState::CodeUploaded,
                to: BootstrapState::CloudDeployed
            }
        ));
        assert_eq!(machine.state(), BootstrapState::CodeUploaded);
    }

    #[test]
    fn re_entering_a_state_is_rejected() {
        let mut machine = BootstrapMachine::attach(BootstrapState::BootNodesSet);

        assert!(machine.advance(BootstrapState::BootNodesSet).is_err());
        assert!(machine.advance(BootstrapState::ValidatorsRegistered).is_err());
        assert!(machine.advance(BootstrapState::ValidatorsJoined).is_ok());
    }

    #[test]
    fn declaration_order_matches_successor_chain() {
        for pair in BootstrapState::ALL.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
            assert!(pair[0] < pair[1]);
        }
    }
}
