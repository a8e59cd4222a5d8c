//! Session lifecycle phase.
//!
//! The phase is never stored anywhere: it is recomputed from the latest
//! on-chain snapshot and the caller's notion of "now" every time it is needed.

/// Human-meaningful lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Phase {
    /// Before the deadline, still waiting for some deposits.
    Waiting,
    /// Everyone deposited, event not reached yet.
    Active,
    /// Voting window `[deadline, voting_end)` is open.
    Voting,
    /// Voting ended, or the deadline passed without full deposits.
    VotingClosed,
    /// Funds were distributed or refunded.
    Finalized,
}

impl Phase {
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Derive the lifecycle phase from raw on-chain fields.
///
/// Rules are checked in order and the first match wins:
///
/// 1. `finalized` → [`Phase::Finalized`]
/// 2. `now >= voting_end` → [`Phase::VotingClosed`]
/// 3. `now >= deadline` and `active` → [`Phase::Voting`]
/// 4. `now >= deadline` and not `active` → [`Phase::VotingClosed`]
/// 5. not `active` → [`Phase::Waiting`]
/// 6. otherwise → [`Phase::Active`]
///
/// A session whose deadline passed without every deposit never votes, so it
/// lands in `VotingClosed` and waits for finalization (which refunds).
pub const fn derive_phase(
    active: bool,
    finalized: bool,
    deadline: u64,
    voting_end: u64,
    now: u64,
) -> Phase {
    if finalized {
        Phase::Finalized
    } else if now >= voting_end {
        Phase::VotingClosed
    } else if now >= deadline && active {
        Phase::Voting
    } else if now >= deadline {
        Phase::VotingClosed
    } else if !active {
        Phase::Waiting
    } else {
        Phase::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const D: u64 = 1_700_000_000;
    const P: u64 = 3_600;

    #[test]
    fn active_before_deadline() {
        assert_eq!(derive_phase(true, false, D, D + P, D - 1), Phase::Active);
    }

    #[test]
    fn waiting_before_deadline_without_all_deposits() {
        assert_eq!(derive_phase(false, false, D, D + P, D - 1), Phase::Waiting);
    }

    #[test]
    fn voting_inside_window() {
        assert_eq!(derive_phase(true, false, D, D + P, D), Phase::Voting);
        assert_eq!(derive_phase(true, false, D, D + P, D + 1), Phase::Voting);
        assert_eq!(derive_phase(true, false, D, D + P, D + P - 1), Phase::Voting);
    }

    #[test]
    fn deadline_passed_without_deposits_is_closed() {
        assert_eq!(derive_phase(false, false, D, D + P, D + 1), Phase::VotingClosed);
    }

    #[test]
    fn closed_at_voting_end() {
        assert_eq!(derive_phase(true, false, D, D + P, D + P), Phase::VotingClosed);
        assert_eq!(derive_phase(false, false, D, D + P, D + P + 10), Phase::VotingClosed);
    }

    #[test]
    fn finalized_dominates() {
        for active in [false, true] {
            for now in [0, D - 1, D, D + 1, D + P, u64::MAX] {
                assert_eq!(derive_phase(active, true, D, D + P, now), Phase::Finalized);
            }
        }
    }

    #[test]
    fn zero_length_voting_period_never_votes() {
        assert_eq!(derive_phase(true, false, D, D, D), Phase::VotingClosed);
    }

    #[test]
    fn total_and_deterministic_over_boundaries() {
        let instants = [0, D - 1, D, D + 1, D + P - 1, D + P, D + P + 1, u64::MAX];
        for active in [false, true] {
            for finalized in [false, true] {
                for now in instants {
                    let first = derive_phase(active, finalized, D, D + P, now);
                    let second = derive_phase(active, finalized, D, D + P, now);
                    assert_eq!(first, second);
                }
            }
        }
    }

    #[test]
    fn labels_are_kebab_case() {
        use strum::IntoEnumIterator;

        assert_eq!(Phase::VotingClosed.label(), "voting-closed");
        assert_eq!(Phase::Waiting.to_string(), "waiting");

        let labels: std::collections::HashSet<_> = Phase::iter().map(Phase::label).collect();
        assert_eq!(labels.len(), 5);
    }
}
