//! Participant list and per-participant flags.
//!
//! The contract exposes participants one index at a time, so a session with
//! `n` participants costs `n` view calls (plus the status reads).

use client_blockchain_core::{SessionReader, TransportError};
use session_core::{Address, ParticipantStatus, Session, SessionId};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default)]
pub struct ParticipantSetLoader;

impl ParticipantSetLoader {
    /// Participants in contract order, indices `0..participant_count`.
    pub async fn load_participants<C>(
        &self,
        chain: &C,
        session: &Session,
    ) -> Result<Vec<Address>, TransportError>
    where
        C: SessionReader + ?Sized,
    {
        let mut participants = Vec::with_capacity(session.participant_count as usize);
        for index in 0..session.participant_count {
            participants.push(chain.participant_at(session.id, index).await?);
        }
        debug!(session = %session.id, count = participants.len(), "Loaded participants");
        Ok(participants)
    }

    pub async fn load_deposit_status<C>(
        &self,
        chain: &C,
        session_id: SessionId,
        address: Address,
    ) -> Result<bool, TransportError>
    where
        C: SessionReader + ?Sized,
    {
        chain.has_deposited(session_id, address).await
    }

    /// Number of `participants` that have deposited.
    pub async fn count_deposits<C>(
        &self,
        chain: &C,
        session_id: SessionId,
        participants: &[Address],
    ) -> Result<usize, TransportError>
    where
        C: SessionReader + ?Sized,
    {
        let mut deposited = 0;
        for participant in participants {
            if self.load_deposit_status(chain, session_id, *participant).await? {
                deposited += 1;
            }
        }
        Ok(deposited)
    }

    /// Deposit, vote and absence-vote flags for every participant.
    pub async fn load_statuses<C>(
        &self,
        chain: &C,
        session: &Session,
    ) -> Result<Vec<ParticipantStatus>, TransportError>
    where
        C: SessionReader + ?Sized,
    {
        let participants = self.load_participants(chain, session).await?;
        let mut statuses = Vec::with_capacity(participants.len());
        for address in participants {
            statuses.push(ParticipantStatus {
                address,
                deposited: chain.has_deposited(session.id, address).await?,
                voted: chain.has_voted(session.id, address).await?,
                absence_votes: chain.absence_vote_count(session.id, address).await?,
            });
        }
        Ok(statuses)
    }
}
