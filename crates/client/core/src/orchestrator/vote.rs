//! Absence vote: `castVote(session, suspect)`.

use client_blockchain_core::{ChainTransport, ContractCall, SessionReader, TozlowChain};
use session_core::{Address, SessionId, check_vote};
use tracing::debug;

use super::{FlowError, FlowOutcome, FlowStep, Operation, OperationState, TransactionOrchestrator};
use crate::participants::ParticipantSetLoader;

#[derive(Clone, Debug)]
pub struct VoteFlow {
    session_id: SessionId,
    suspect: Address,
    operation: Operation,
}

impl VoteFlow {
    pub const fn new(session_id: SessionId, suspect: Address) -> Self {
        Self {
            session_id,
            suspect,
            operation: Operation::new("vote"),
        }
    }

    pub const fn state(&self) -> &OperationState {
        self.operation.state()
    }

    /// Check the voting window and the suspect, then vote.
    ///
    /// `now` is compared against the session's deadline and voting end; a
    /// failed check returns [`FlowError::Validation`] without sending anything.
    pub async fn run<C>(
        &mut self,
        chain: &C,
        orchestrator: &TransactionOrchestrator,
        now: u64,
    ) -> Result<FlowOutcome, FlowError>
    where
        C: TozlowChain + ?Sized,
    {
        self.operation.begin()?;
        let voter = chain.account();

        let session = chain
            .get_session(self.session_id)
            .await
            .map_err(|e| orchestrator.fail(&mut self.operation, e))?;
        let participants = ParticipantSetLoader
            .load_participants(chain, &session)
            .await
            .map_err(|e| orchestrator.fail(&mut self.operation, e))?;

        check_vote(&session, &participants, &voter, &self.suspect, now)?;
        debug!(session = %self.session_id, %voter, suspect = %self.suspect, "Vote checks passed");

        let call = ContractCall::CastVote {
            session_id: self.session_id,
            suspect: self.suspect,
        };
        let tx = orchestrator
            .submit_step(chain, &mut self.operation, FlowStep::CastVote, call)
            .await?;
        orchestrator.confirm(chain, &mut self.operation, &tx).await?;
        self.operation.complete(Some(tx));

        let session_id = self.session_id;
        let reconciled = orchestrator
            .reconciler()
            .wait_until("vote", || chain.has_voted(session_id, voter))
            .await;

        Ok(FlowOutcome {
            transaction: Some(tx),
            reconciled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use session_core::{Session, ValidationError};

    use crate::reconcile::{ReconcileConfig, Reconciler};
    use crate::{ErrorTranslator, FeeEstimator};
    use client_blockchain_core::MockChain;

    const DEADLINE: u64 = 1_000;
    const VOTING: u64 = 600;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn orchestrator() -> TransactionOrchestrator {
        TransactionOrchestrator::new(
            FeeEstimator::default(),
            ErrorTranslator,
            Reconciler::new(ReconcileConfig::new(2, Duration::from_millis(1))),
        )
    }

    fn active_session(chain: &MockChain) -> SessionId {
        chain.insert_session(
            Session {
                id: SessionId(0),
                host: addr(1),
                amount_per_person: 10,
                deadline: DEADLINE,
                voting_period: VOTING,
                finalized: false,
                active: true,
                participant_count: 0,
            },
            vec![addr(1), addr(2), addr(3)],
        )
    }

    #[tokio::test]
    async fn votes_inside_window() {
        let chain = MockChain::new(addr(1));
        let id = active_session(&chain);
        chain.set_time(DEADLINE + 10);

        let mut flow = VoteFlow::new(id, addr(3));
        let outcome = flow.run(&chain, &orchestrator(), DEADLINE + 10).await.unwrap();

        assert!(outcome.reconciled.is_visible());
        assert_eq!(chain.absence_vote_count(id, addr(3)).await.unwrap(), 1);
        assert!(matches!(flow.state(), OperationState::Done { tx: Some(_) }));
    }

    #[tokio::test]
    async fn window_checks_send_nothing() {
        let chain = MockChain::new(addr(1));
        let id = active_session(&chain);

        let mut early = VoteFlow::new(id, addr(3));
        let err = early.run(&chain, &orchestrator(), DEADLINE - 1).await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::VotingNotOpen { .. })
        ));
        assert_eq!(early.state(), &OperationState::Idle);

        let mut late = VoteFlow::new(id, addr(3));
        let err = late
            .run(&chain, &orchestrator(), DEADLINE + VOTING)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::VotingClosed { .. })
        ));

        assert!(chain.submitted().is_empty());
    }

    #[tokio::test]
    async fn rejects_self_and_outsider_suspects() {
        let chain = MockChain::new(addr(1));
        let id = active_session(&chain);
        let now = DEADLINE + 1;

        let err = VoteFlow::new(id, addr(1))
            .run(&chain, &orchestrator(), now)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Validation(ValidationError::CannotVoteSelf)));

        let err = VoteFlow::new(id, addr(9))
            .run(&chain, &orchestrator(), now)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Validation(ValidationError::NotParticipant(_))));

        assert!(chain.submitted().is_empty());
    }

    #[tokio::test]
    async fn contract_revert_is_translated() {
        let chain = MockChain::new(addr(1));
        let id = active_session(&chain);
        chain.set_time(DEADLINE + 1);

        VoteFlow::new(id, addr(2))
            .run(&chain, &orchestrator(), DEADLINE + 1)
            .await
            .unwrap();
        let err = VoteFlow::new(id, addr(3))
            .run(&chain, &orchestrator(), DEADLINE + 1)
            .await
            .unwrap_err();

        match err {
            FlowError::Failed { message, .. } => {
                assert_eq!(message.text, "You already voted in this session.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
