//! Session listings.
//!
//! There is no per-account index on chain, so "my sessions" is a full scan of
//! every session id followed by a membership check. That is `N` sessions times
//! up to five participant reads, which is acceptable at the contract's scale.

use client_blockchain_core::{SessionReader, TransportError};
use session_core::{Address, ParticipantStatus, SessionId, SessionSummary};
use tracing::{debug, info};

use crate::participants::ParticipantSetLoader;

/// Summary plus full participant flags, for a single-session view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionDetail {
    pub summary: SessionSummary,
    pub statuses: Vec<ParticipantStatus>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SessionCatalog {
    loader: ParticipantSetLoader,
}

impl SessionCatalog {
    pub const fn new(loader: ParticipantSetLoader) -> Self {
        Self { loader }
    }

    /// Sessions `caller` participates in, most recent first.
    ///
    /// Any failed read aborts the whole listing.
    pub async fn load_mine<C>(
        &self,
        chain: &C,
        caller: Address,
        now: u64,
    ) -> Result<Vec<SessionSummary>, TransportError>
    where
        C: SessionReader + ?Sized,
    {
        let count = chain.session_count().await?;
        let mut mine = Vec::new();

        for id in (0..count).rev().map(SessionId) {
            let session = chain.get_session(id).await?;
            let participants = self.loader.load_participants(chain, &session).await?;
            if !participants.contains(&caller) {
                continue;
            }

            let deposited = self.loader.count_deposits(chain, id, &participants).await?;
            mine.push(SessionSummary::new(session, participants, deposited, now));
        }

        info!(%caller, scanned = count, found = mine.len(), "Loaded sessions");
        Ok(mine)
    }

    pub async fn load_one<C>(
        &self,
        chain: &C,
        id: SessionId,
        now: u64,
    ) -> Result<SessionSummary, TransportError>
    where
        C: SessionReader + ?Sized,
    {
        let session = chain.get_session(id).await?;
        let participants = self.loader.load_participants(chain, &session).await?;
        let deposited = self.loader.count_deposits(chain, id, &participants).await?;
        debug!(session = %id, deposited, "Loaded session");
        Ok(SessionSummary::new(session, participants, deposited, now))
    }

    pub async fn load_detail<C>(
        &self,
        chain: &C,
        id: SessionId,
        now: u64,
    ) -> Result<SessionDetail, TransportError>
    where
        C: SessionReader + ?Sized,
    {
        let session = chain.get_session(id).await?;
        let statuses = self.loader.load_statuses(chain, &session).await?;
        let participants = statuses.iter().map(|s| s.address).collect();
        let deposited = statuses.iter().filter(|s| s.deposited).count();
        Ok(SessionDetail {
            summary: SessionSummary::new(session, participants, deposited, now),
            statuses,
        })
    }
}
