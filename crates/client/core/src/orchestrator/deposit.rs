//! Deposit: optional `approve`, then `deposit`.
//!
//! Nothing is sent unless the session still takes deposits at `now` and the
//! account is one of its participants.
//!
//! The approval is only sent when the current allowance does not cover the
//! stake, and exactly for the stake amount. Its confirmation moves the flow to
//! the deposit step once; any repeated notification for the same approval is
//! dropped by the state check in [`DepositFlow::on_approval_confirmed`].

use client_blockchain_core::{
    ChainTransport, ContractCall, SessionReader, TokenReader, TozlowChain, TransactionId,
};
use session_core::{SessionId, check_deposit};
use tracing::{debug, info};

use super::{FlowError, FlowOutcome, FlowStep, Operation, OperationState, TransactionOrchestrator};
use crate::participants::ParticipantSetLoader;

#[derive(Clone, Debug)]
pub struct DepositFlow {
    session_id: SessionId,
    operation: Operation,
}

impl DepositFlow {
    pub const fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            operation: Operation::new("deposit"),
        }
    }

    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub const fn state(&self) -> &OperationState {
        self.operation.state()
    }

    /// Send the first write. Returns the transaction to wait for, or `None`
    /// when the caller has already deposited.
    pub async fn start<C>(
        &mut self,
        chain: &C,
        orchestrator: &TransactionOrchestrator,
        now: u64,
    ) -> Result<Option<TransactionId>, FlowError>
    where
        C: TozlowChain + ?Sized,
    {
        self.operation.begin()?;

        let owner = chain.account();
        let spender = chain.contract_address();

        let already = chain
            .has_deposited(self.session_id, owner)
            .await
            .map_err(|e| orchestrator.fail(&mut self.operation, e))?;
        if already {
            info!(session = %self.session_id, %owner, "Already deposited, nothing to send");
            self.operation.complete(None);
            return Ok(None);
        }

        let session = chain
            .get_session(self.session_id)
            .await
            .map_err(|e| orchestrator.fail(&mut self.operation, e))?;
        let participants = ParticipantSetLoader
            .load_participants(chain, &session)
            .await
            .map_err(|e| orchestrator.fail(&mut self.operation, e))?;
        check_deposit(&session, &participants, &owner, now)?;
        let amount = session.amount_per_person;

        let allowance = chain
            .allowance(owner, spender)
            .await
            .map_err(|e| orchestrator.fail(&mut self.operation, e))?;
        debug!(session = %self.session_id, allowance, amount, "Read allowance");

        let tx = if allowance < amount {
            orchestrator
                .submit_step(
                    chain,
                    &mut self.operation,
                    FlowStep::Approve,
                    ContractCall::Approve { spender, amount },
                )
                .await?
        } else {
            self.submit_deposit(chain, orchestrator).await?
        };
        Ok(Some(tx))
    }

    /// Handle a confirmed approval. Only the first notification for the
    /// approval currently awaited sends the deposit; anything else is ignored
    /// and returns `None`.
    pub async fn on_approval_confirmed<C>(
        &mut self,
        chain: &C,
        orchestrator: &TransactionOrchestrator,
        tx: &TransactionId,
    ) -> Result<Option<TransactionId>, FlowError>
    where
        C: TozlowChain + ?Sized,
    {
        if !self.operation.is_awaiting(FlowStep::Approve, tx) {
            debug!(session = %self.session_id, %tx, state = ?self.operation.state(), "Ignoring approval confirmation");
            return Ok(None);
        }
        self.submit_deposit(chain, orchestrator).await.map(Some)
    }

    /// Handle a confirmed deposit. Returns whether it completed the flow.
    pub fn on_deposit_confirmed(&mut self, tx: &TransactionId) -> bool {
        if !self.operation.is_awaiting(FlowStep::Deposit, tx) {
            debug!(session = %self.session_id, %tx, "Ignoring deposit confirmation");
            return false;
        }
        self.operation.complete(Some(*tx));
        true
    }

    /// Drive the flow to completion, then wait until the deposit is readable.
    pub async fn run<C>(
        &mut self,
        chain: &C,
        orchestrator: &TransactionOrchestrator,
        now: u64,
    ) -> Result<FlowOutcome, FlowError>
    where
        C: TozlowChain + ?Sized,
    {
        let mut pending = self.start(chain, orchestrator, now).await?;
        let mut last = None;

        while let Some(tx) = pending {
            orchestrator.confirm(chain, &mut self.operation, &tx).await?;
            last = Some(tx);
            pending = if self.operation.is_awaiting(FlowStep::Approve, &tx) {
                self.on_approval_confirmed(chain, orchestrator, &tx).await?
            } else {
                self.on_deposit_confirmed(&tx);
                None
            };
        }

        if last.is_none() {
            return Ok(FlowOutcome::nothing_to_do());
        }

        let owner = chain.account();
        let session_id = self.session_id;
        let reconciled = orchestrator
            .reconciler()
            .wait_until("deposit", || chain.has_deposited(session_id, owner))
            .await;

        Ok(FlowOutcome {
            transaction: last,
            reconciled,
        })
    }

    async fn submit_deposit<C>(
        &mut self,
        chain: &C,
        orchestrator: &TransactionOrchestrator,
    ) -> Result<TransactionId, FlowError>
    where
        C: TozlowChain + ?Sized,
    {
        orchestrator
            .submit_step(
                chain,
                &mut self.operation,
                FlowStep::Deposit,
                ContractCall::Deposit {
                    session_id: self.session_id,
                },
            )
            .await
    }
}
