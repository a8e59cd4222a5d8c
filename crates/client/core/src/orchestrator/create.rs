//! `createSession` from validated user input.

use client_blockchain_core::{ChainTransport, ContractCall, SessionReader, TozlowChain, TransportError};
use session_core::{Address, CreateSessionRequest, SessionId, ValidatedSession};
use tracing::{info, warn};

use super::{FlowError, FlowOutcome, FlowStep, Operation, OperationState, TransactionOrchestrator};

/// Result of a create flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreatedSession {
    pub outcome: FlowOutcome,
    /// Id of the new session, once visible through reads.
    pub session_id: Option<SessionId>,
}

#[derive(Clone, Debug)]
pub struct CreateSessionFlow {
    request: CreateSessionRequest,
    operation: Operation,
}

impl CreateSessionFlow {
    pub fn new(request: CreateSessionRequest) -> Self {
        Self {
            request,
            operation: Operation::new("create-session"),
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
    ) -> Result<CreatedSession, FlowError>
    where
        C: TozlowChain + ?Sized,
    {
        self.operation.begin()?;
        let validated = self.request.validate(now)?;

        let count_before = chain
            .session_count()
            .await
            .map_err(|e| orchestrator.fail(&mut self.operation, e))?;

        let call = ContractCall::CreateSession {
            amount_per_person: validated.amount_per_person,
            deadline: validated.deadline,
            voting_period: validated.voting_period,
            participants: validated.participants.clone(),
        };
        let tx = orchestrator
            .submit_step(chain, &mut self.operation, FlowStep::CreateSession, call)
            .await?;
        orchestrator.confirm(chain, &mut self.operation, &tx).await?;
        self.operation.complete(Some(tx));

        let reconciled = orchestrator
            .reconciler()
            .wait_until("create-session", || async move {
                chain.session_count().await.map(|count| count > count_before)
            })
            .await;

        let session_id = if reconciled.is_visible() {
            find_created(chain, chain.account(), count_before, &validated)
                .await
                .unwrap_or_else(|error| {
                    warn!(%error, "Could not look up the new session id");
                    None
                })
        } else {
            None
        };
        info!(session = ?session_id, participants = validated.participants.len(), "Session created");

        Ok(CreatedSession {
            outcome: FlowOutcome {
                transaction: Some(tx),
                reconciled,
            },
            session_id,
        })
    }
}

/// First session at or after `from` hosted by `host` with matching terms.
///
/// Ids are sequential, but another account may create a session in the same
/// block, so the new id is found by content rather than assumed.
async fn find_created<C>(
    chain: &C,
    host: Address,
    from: u64,
    expected: &ValidatedSession,
) -> Result<Option<SessionId>, TransportError>
where
    C: SessionReader + ?Sized,
{
    let count = chain.session_count().await?;
    for id in (from..count).map(SessionId) {
        let session = chain.get_session(id).await?;
        if session.host == host
            && session.deadline == expected.deadline
            && session.amount_per_person == expected.amount_per_person
            && session.participant_count as usize == expected.participants.len()
        {
            return Ok(Some(id));
        }
    }
    Ok(None)
}
