//! Named revert reasons of the session contract.
//!
//! The contract's custom errors form a closed set, so they live here as a
//! compile-time enum instead of being looked up from an ABI at runtime.
//! Adapters decode raw revert data into this enum; anything that does not
//! match ends up as [`crate::CallError::UnknownRevert`].

use strum::{EnumIter, EnumString, IntoStaticStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter, strum::Display)]
pub enum RevertReason {
    AlreadyInitialized,
    NotParticipant,
    AlreadyDeposited,
    DeadlineNotReached,
    DeadlineReached,
    AlreadyFinalized,
    NotEnoughParticipants,
    TooManyParticipants,
    TransferFailed,
    AlreadyVoted,
    InvalidAbsent,
    NotAllDeposited,
    VotingNotOpen,
    VotingClosed,
    SessionNotActive,
    CannotVoteSelf,
}

impl RevertReason {
    /// Look up a reason by its Solidity error name (e.g. `"AlreadyVoted"`).
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn names_round_trip_through_lookup() {
        for reason in RevertReason::iter() {
            assert_eq!(RevertReason::from_name(reason.name()), Some(reason));
        }
        assert_eq!(RevertReason::iter().count(), 16);
    }

    #[test]
    fn unknown_names_are_not_matched() {
        assert_eq!(RevertReason::from_name("ERC20InsufficientAllowance"), None);
        assert_eq!(RevertReason::from_name("alreadyvoted"), None);
    }
}
