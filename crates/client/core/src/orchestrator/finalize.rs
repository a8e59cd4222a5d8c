//! `finalizeSession`, once the voting window has closed.

use client_blockchain_core::{ContractCall, SessionReader, TozlowChain};
use session_core::{SessionId, check_finalize};

use super::{FlowError, FlowOutcome, FlowStep, Operation, OperationState, TransactionOrchestrator};

#[derive(Clone, Debug)]
pub struct FinalizeFlow {
    session_id: SessionId,
    operation: Operation,
}

impl FinalizeFlow {
    pub const fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            operation: Operation::new("finalize"),
        }
    }

    pub const fn state(&self) -> &OperationState {
        self.operation.state()
    }

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

        let session = chain
            .get_session(self.session_id)
            .await
            .map_err(|e| orchestrator.fail(&mut self.operation, e))?;
        check_finalize(&session, now)?;

        let call = ContractCall::FinalizeSession {
            session_id: self.session_id,
        };
        let tx = orchestrator
            .submit_step(chain, &mut self.operation, FlowStep::Finalize, call)
            .await?;
        orchestrator.confirm(chain, &mut self.operation, &tx).await?;
        self.operation.complete(Some(tx));

        let session_id = self.session_id;
        let reconciled = orchestrator
            .reconciler()
            .wait_until("finalize", || async move {
                chain.get_session(session_id).await.map(|s| s.finalized)
            })
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

    use client_blockchain_core::{CallError, MockChain, TransportError};
    use session_core::{Address, Session, ValidationError};

    use crate::translate::ErrorCategory;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn session(chain: &MockChain) -> SessionId {
        chain.insert_session(
            Session {
                id: SessionId(0),
                host: addr(1),
                amount_per_person: 10,
                deadline: 1_000,
                voting_period: 600,
                finalized: false,
                active: true,
                participant_count: 0,
            },
            vec![addr(1), addr(2), addr(3)],
        )
    }

    #[tokio::test]
    async fn finalizes_after_voting_end() {
        let chain = MockChain::new(addr(2));
        let id = session(&chain);
        chain.set_time(1_600);

        let mut flow = FinalizeFlow::new(id);
        flow.run(&chain, &TransactionOrchestrator::default(), 1_600)
            .await
            .unwrap();

        assert!(chain.get_session(id).await.unwrap().finalized);
        assert_eq!(chain.submitted_named("finalizeSession"), 1);

        let err = flow
            .run(&chain, &TransactionOrchestrator::default(), 1_600)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::AlreadyCompleted));
    }

    #[tokio::test]
    async fn too_early_is_a_validation_error() {
        let chain = MockChain::new(addr(2));
        let id = session(&chain);

        let err = FinalizeFlow::new(id)
            .run(&chain, &TransactionOrchestrator::default(), 1_599)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FlowError::Validation(ValidationError::FinalizeTooEarly { voting_end: 1_600 })
        ));
        assert!(chain.submitted().is_empty());
    }

    #[tokio::test]
    async fn network_failure_can_be_retried() {
        let chain = MockChain::new(addr(2));
        let id = session(&chain);
        chain.set_time(2_000);
        let orchestrator = TransactionOrchestrator::default();
        let mut flow = FinalizeFlow::new(id);

        chain.fail_next_submit(CallError::Transport(TransportError::NetworkError(
            "connection reset".into(),
        )));
        let err = flow.run(&chain, &orchestrator, 2_000).await.unwrap_err();
        assert_eq!(
            err.user_message(orchestrator.translator()).category,
            ErrorCategory::Infrastructure
        );

        flow.run(&chain, &orchestrator, 2_000).await.unwrap();
        assert!(matches!(flow.state(), OperationState::Done { .. }));
    }
}
