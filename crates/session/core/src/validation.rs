//! Pre-submission checks.
//!
//! These mirror contract-side rules so obviously invalid writes are stopped
//! before a wallet prompt. The contract remains authoritative and may still
//! reject a write that passes here (e.g. the block timestamp moved past the
//! deadline while the transaction sat in the mempool).

use std::collections::HashSet;

use crate::address::Address;
use crate::error::ValidationError;
use crate::session::Session;

pub const MIN_PARTICIPANTS: usize = 3;
pub const MAX_PARTICIPANTS: usize = 5;
pub const MIN_VOTING_PERIOD_SECS: u64 = 60;

/// User input for a new session. The host is added to the participant list
/// automatically and does not need to appear in `invitees`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateSessionRequest {
    pub host: Address,
    pub amount_per_person: u128,
    pub deadline: u64,
    pub voting_period: u64,
    pub invitees: Vec<Address>,
}

/// Arguments for `createSession`, in contract order, after validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedSession {
    pub amount_per_person: u128,
    pub deadline: u64,
    pub voting_period: u64,
    pub participants: Vec<Address>,
}

impl CreateSessionRequest {
    pub fn validate(&self, now: u64) -> Result<ValidatedSession, ValidationError> {
        if self.amount_per_person == 0 {
            return Err(ValidationError::ZeroAmount);
        }
        if self.deadline <= now {
            return Err(ValidationError::DeadlineNotInFuture {
                deadline: self.deadline,
                now,
            });
        }
        if self.voting_period < MIN_VOTING_PERIOD_SECS {
            return Err(ValidationError::VotingPeriodTooShort {
                seconds: self.voting_period,
                min: MIN_VOTING_PERIOD_SECS,
            });
        }

        let mut participants = Vec::with_capacity(self.invitees.len() + 1);
        participants.push(self.host);
        let mut seen: HashSet<Address> = HashSet::from([self.host]);

        for invitee in &self.invitees {
            if invitee.is_zero() {
                return Err(ValidationError::ZeroAddressParticipant);
            }
            // Listing the host again is harmless; they are already first.
            if *invitee == self.host {
                continue;
            }
            if !seen.insert(*invitee) {
                return Err(ValidationError::DuplicateParticipant(*invitee));
            }
            participants.push(*invitee);
        }

        let count = participants.len();
        if count < MIN_PARTICIPANTS {
            return Err(ValidationError::NotEnoughParticipants {
                count,
                min: MIN_PARTICIPANTS,
            });
        }
        if count > MAX_PARTICIPANTS {
            return Err(ValidationError::TooManyParticipants {
                count,
                max: MAX_PARTICIPANTS,
            });
        }

        Ok(ValidatedSession {
            amount_per_person: self.amount_per_person,
            deadline: self.deadline,
            voting_period: self.voting_period,
            participants,
        })
    }
}

/// Checks before `deposit(session)` from `depositor`.
pub fn check_deposit(
    session: &Session,
    participants: &[Address],
    depositor: &Address,
    now: u64,
) -> Result<(), ValidationError> {
    if session.finalized {
        return Err(ValidationError::AlreadyFinalized);
    }
    if !session.deposits_open(now) {
        return Err(ValidationError::DepositsClosed {
            deadline: session.deadline,
        });
    }
    if !participants.contains(depositor) {
        return Err(ValidationError::NotParticipant(*depositor));
    }
    Ok(())
}

/// Checks before `castVote(session, suspect)` from `voter`.
pub fn check_vote(
    session: &Session,
    participants: &[Address],
    voter: &Address,
    suspect: &Address,
    now: u64,
) -> Result<(), ValidationError> {
    if session.finalized {
        return Err(ValidationError::AlreadyFinalized);
    }
    if !session.is_voting_open(now) {
        return Err(if now < session.deadline {
            ValidationError::VotingNotOpen {
                opens_at: session.deadline,
            }
        } else {
            ValidationError::VotingClosed {
                closed_at: session.voting_end(),
            }
        });
    }
    if !session.active {
        return Err(ValidationError::SessionNotActive);
    }
    if voter == suspect {
        return Err(ValidationError::CannotVoteSelf);
    }
    if !participants.contains(voter) {
        return Err(ValidationError::NotParticipant(*voter));
    }
    if !participants.contains(suspect) {
        return Err(ValidationError::NotParticipant(*suspect));
    }
    Ok(())
}

/// Checks before `finalizeSession(session)`.
pub fn check_finalize(session: &Session, now: u64) -> Result<(), ValidationError> {
    if session.finalized {
        return Err(ValidationError::AlreadyFinalized);
    }
    if !session.can_finalize(now) {
        return Err(ValidationError::FinalizeTooEarly {
            voting_end: session.voting_end(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionId;

    const NOW: u64 = 1_000;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn request(invitees: Vec<Address>) -> CreateSessionRequest {
        CreateSessionRequest {
            host: addr(1),
            amount_per_person: 1_000_000,
            deadline: NOW + 3_600,
            voting_period: 600,
            invitees,
        }
    }

    fn voting_session() -> Session {
        Session {
            id: SessionId(0),
            host: addr(1),
            amount_per_person: 1_000_000,
            deadline: NOW,
            voting_period: 600,
            finalized: false,
            active: true,
            participant_count: 3,
        }
    }

    #[test]
    fn host_is_prepended() {
        let validated = request(vec![addr(2), addr(3)]).validate(NOW).unwrap();
        assert_eq!(validated.participants, vec![addr(1), addr(2), addr(3)]);
    }

    #[test]
    fn host_listed_again_is_ignored() {
        let validated = request(vec![addr(2), addr(1), addr(3)]).validate(NOW).unwrap();
        assert_eq!(validated.participants.len(), 3);
    }

    #[test]
    fn participant_bounds() {
        assert_eq!(
            request(vec![addr(2)]).validate(NOW),
            Err(ValidationError::NotEnoughParticipants { count: 2, min: 3 })
        );
        assert!(request(vec![addr(2), addr(3), addr(4), addr(5)]).validate(NOW).is_ok());
        assert_eq!(
            request(vec![addr(2), addr(3), addr(4), addr(5), addr(6)]).validate(NOW),
            Err(ValidationError::TooManyParticipants { count: 6, max: 5 })
        );
    }

    #[test]
    fn rejects_duplicates_and_zero_address() {
        assert_eq!(
            request(vec![addr(2), addr(2)]).validate(NOW),
            Err(ValidationError::DuplicateParticipant(addr(2)))
        );
        assert_eq!(
            request(vec![addr(2), Address::ZERO]).validate(NOW),
            Err(ValidationError::ZeroAddressParticipant)
        );
    }

    #[test]
    fn rejects_past_deadline_short_voting_and_zero_amount() {
        let mut req = request(vec![addr(2), addr(3)]);
        req.deadline = NOW;
        assert!(matches!(req.validate(NOW), Err(ValidationError::DeadlineNotInFuture { .. })));

        let mut req = request(vec![addr(2), addr(3)]);
        req.voting_period = 59;
        assert!(matches!(req.validate(NOW), Err(ValidationError::VotingPeriodTooShort { .. })));

        let mut req = request(vec![addr(2), addr(3)]);
        req.amount_per_person = 0;
        assert_eq!(req.validate(NOW), Err(ValidationError::ZeroAmount));
    }

    #[test]
    fn vote_requires_open_window() {
        let s = voting_session();
        let people = [addr(1), addr(2), addr(3)];
        assert!(matches!(
            check_vote(&s, &people, &addr(1), &addr(2), NOW - 1),
            Err(ValidationError::VotingNotOpen { .. })
        ));
        assert!(check_vote(&s, &people, &addr(1), &addr(2), NOW).is_ok());
        assert!(matches!(
            check_vote(&s, &people, &addr(1), &addr(2), NOW + 600),
            Err(ValidationError::VotingClosed { .. })
        ));
    }

    #[test]
    fn vote_rejects_self_outsiders_and_inactive() {
        let mut s = voting_session();
        let people = [addr(1), addr(2), addr(3)];
        assert_eq!(
            check_vote(&s, &people, &addr(2), &addr(2), NOW),
            Err(ValidationError::CannotVoteSelf)
        );
        assert_eq!(
            check_vote(&s, &people, &addr(1), &addr(9), NOW),
            Err(ValidationError::NotParticipant(addr(9)))
        );
        s.active = false;
        assert_eq!(
            check_vote(&s, &people, &addr(1), &addr(2), NOW),
            Err(ValidationError::SessionNotActive)
        );
    }

    #[test]
    fn deposit_only_before_deadline() {
        let mut s = voting_session();
        s.active = false;
        let people = [addr(1), addr(2), addr(3)];
        assert!(check_deposit(&s, &people, &addr(2), NOW - 1).is_ok());
        assert_eq!(
            check_deposit(&s, &people, &addr(2), NOW),
            Err(ValidationError::DepositsClosed { deadline: NOW })
        );
        assert_eq!(
            check_deposit(&s, &people, &addr(9), NOW - 1),
            Err(ValidationError::NotParticipant(addr(9)))
        );
        s.finalized = true;
        assert_eq!(
            check_deposit(&s, &people, &addr(2), NOW - 1),
            Err(ValidationError::AlreadyFinalized)
        );
    }

    #[test]
    fn finalize_only_after_voting_end() {
        let mut s = voting_session();
        assert!(matches!(
            check_finalize(&s, NOW + 599),
            Err(ValidationError::FinalizeTooEarly { voting_end: 1_600 })
        ));
        assert!(check_finalize(&s, NOW + 600).is_ok());
        s.finalized = true;
        assert_eq!(check_finalize(&s, NOW + 600), Err(ValidationError::AlreadyFinalized));
    }
}
