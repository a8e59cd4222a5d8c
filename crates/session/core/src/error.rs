//! Client-side validation errors.
//!
//! Everything here is detected before a transaction is built, so none of these
//! conditions ever reach the network. The contract enforces the same rules;
//! these checks only save the user a failed round trip.

use crate::address::Address;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Malformed address: {0}")]
    InvalidAddress(String),

    #[error("Malformed USDC amount: {0}")]
    InvalidAmount(String),

    #[error("Amount per person must be greater than zero")]
    ZeroAmount,

    #[error("At least {min} participants are required (got {count})")]
    NotEnoughParticipants { count: usize, min: usize },

    #[error("At most {max} participants are allowed (got {count})")]
    TooManyParticipants { count: usize, max: usize },

    #[error("Participant listed twice: {0}")]
    DuplicateParticipant(Address),

    #[error("The zero address cannot be a participant")]
    ZeroAddressParticipant,

    #[error("Event date must be in the future (deadline {deadline}, now {now})")]
    DeadlineNotInFuture { deadline: u64, now: u64 },

    #[error("Voting period must be at least {min} seconds (got {seconds})")]
    VotingPeriodTooShort { seconds: u64, min: u64 },

    #[error("Deposits closed at the meeting date ({deadline})")]
    DepositsClosed { deadline: u64 },

    #[error("Voting window has not opened yet (opens at {opens_at})")]
    VotingNotOpen { opens_at: u64 },

    #[error("Voting window closed at {closed_at}")]
    VotingClosed { closed_at: u64 },

    #[error("You cannot vote for yourself")]
    CannotVoteSelf,

    #[error("{0} is not a participant of this session")]
    NotParticipant(Address),

    #[error("Session is not active (missing deposits)")]
    SessionNotActive,

    #[error("Session is already finalized")]
    AlreadyFinalized,

    #[error("Session cannot be finalized before voting ends at {voting_end}")]
    FinalizeTooEarly { voting_end: u64 },
}
