//! Session snapshot types.
//!
//! All of these are read-only copies of contract state taken at one point in
//! time. They are rebuilt from scratch on every load and never written back.

use std::fmt;

use crate::address::Address;
use crate::phase::{Phase, derive_phase};

/// Contract-assigned session identifier (monotonic, starting at zero).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SessionId(pub u64);

impl SessionId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SessionId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// On-chain session record (1:1 with the contract's `getSession` view).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Session {
    pub id: SessionId,

    /// Creator of the session.
    pub host: Address,

    /// Stake per participant in USDC minor units.
    pub amount_per_person: u128,

    /// Event time, Unix seconds.
    pub deadline: u64,

    /// Length of the voting window in seconds.
    pub voting_period: u64,

    pub finalized: bool,

    /// Set by the contract once every participant has deposited.
    pub active: bool,

    pub participant_count: u8,
}

impl Session {
    /// End of the voting window (exclusive).
    pub const fn voting_end(&self) -> u64 {
        self.deadline.saturating_add(self.voting_period)
    }

    pub const fn phase(&self, now: u64) -> Phase {
        derive_phase(
            self.active,
            self.finalized,
            self.deadline,
            self.voting_end(),
            now,
        )
    }

    /// `deadline <= now < voting_end`.
    pub const fn is_voting_open(&self, now: u64) -> bool {
        now >= self.deadline && now < self.voting_end()
    }

    pub const fn can_finalize(&self, now: u64) -> bool {
        now >= self.voting_end() && !self.finalized
    }

    pub const fn deposits_open(&self, now: u64) -> bool {
        now < self.deadline && !self.finalized
    }

    /// Seconds left to vote, zero outside the window.
    pub const fn voting_seconds_remaining(&self, now: u64) -> u64 {
        if self.is_voting_open(now) {
            self.voting_end() - now
        } else {
            0
        }
    }
}

/// Per-participant flags for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantStatus {
    pub address: Address,
    pub deposited: bool,
    pub voted: bool,
    pub absence_votes: u64,
}

/// Session plus locally computed aggregates, as shown in listings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSummary {
    pub session: Session,
    pub participants: Vec<Address>,
    pub deposited_count: usize,
    pub phase: Phase,
}

impl SessionSummary {
    pub fn new(session: Session, participants: Vec<Address>, deposited_count: usize, now: u64) -> Self {
        let phase = session.phase(now);
        Self {
            session,
            participants,
            deposited_count,
            phase,
        }
    }

    pub fn includes(&self, address: &Address) -> bool {
        self.participants.contains(address)
    }
}
