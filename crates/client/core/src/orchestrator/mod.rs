//! Multi-step write sequencing.
//!
//! Each user action is a small state machine ([`Operation`]) driven by a flow
//! object that owns it. The [`TransactionOrchestrator`] holds the shared,
//! stateless pieces: fee estimation right before every submission, error
//! translation, and read-after-write reconciliation.
//!
//! ```text
//! Idle ─► Submitting(step) ─► Confirming(step, tx) ─┬─► Submitting(next)
//!  ▲                                                ├─► Done
//!  └──────────────── retry ◄──── Failed(msg) ◄──────┘
//! ```
//!
//! Flows never retry on their own and never apply a confirmation timeout of
//! their own; the adapter's receipt polling decides how long to wait.

mod create;
mod deposit;
mod finalize;
mod vote;

pub use create::{CreateSessionFlow, CreatedSession};
pub use deposit::DepositFlow;
pub use finalize::FinalizeFlow;
pub use vote::VoteFlow;

use client_blockchain_core::{
    CallError, ContractCall, Receipt, TozlowChain, TransactionData, TransactionId,
};
use session_core::ValidationError;
use strum::{Display, IntoStaticStr};
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::fees::FeeEstimator;
use crate::reconcile::{Reconciled, Reconciler};
use crate::translate::{ErrorCategory, ErrorTranslator, UserMessage};

// ============================================================================
// Operation state
// ============================================================================

/// One write within a flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum FlowStep {
    Approve,
    Deposit,
    CastVote,
    Finalize,
    CreateSession,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    Submitting(FlowStep),
    Confirming { step: FlowStep, tx: TransactionId },
    /// `tx` is `None` when nothing had to be written.
    Done { tx: Option<TransactionId> },
    Failed(UserMessage),
}

impl OperationState {
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Submitting(_) | Self::Confirming { .. })
    }
}

/// State of one compound operation, with logged transitions.
#[derive(Clone, Debug)]
pub struct Operation {
    name: &'static str,
    state: OperationState,
}

impl Operation {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            state: OperationState::Idle,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn state(&self) -> &OperationState {
        &self.state
    }

    /// Enter a new run. Allowed from `Idle` and `Failed`.
    pub fn begin(&mut self) -> Result<(), FlowError> {
        match self.state {
            OperationState::Idle | OperationState::Failed(_) => {
                self.state = OperationState::Idle;
                Ok(())
            }
            OperationState::Submitting(_) | OperationState::Confirming { .. } => {
                Err(FlowError::InProgress)
            }
            OperationState::Done { .. } => Err(FlowError::AlreadyCompleted),
        }
    }

    /// Whether the operation waits on exactly this confirmation.
    pub fn is_awaiting(&self, step: FlowStep, tx: &TransactionId) -> bool {
        matches!(&self.state, OperationState::Confirming { step: s, tx: t } if *s == step && t == tx)
    }

    fn submitting(&mut self, step: FlowStep) {
        info!(operation = self.name, %step, "Submitting");
        self.state = OperationState::Submitting(step);
    }

    fn confirming(&mut self, step: FlowStep, tx: TransactionId) {
        info!(operation = self.name, %step, %tx, "Waiting for confirmation");
        self.state = OperationState::Confirming { step, tx };
    }

    fn complete(&mut self, tx: Option<TransactionId>) {
        info!(operation = self.name, tx = ?tx, "Done");
        self.state = OperationState::Done { tx };
    }

    fn fail(&mut self, message: UserMessage) {
        warn!(operation = self.name, category = %message.category, %message, "Failed");
        self.state = OperationState::Failed(message);
    }
}

// ============================================================================
// Errors and outcomes
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Caught before anything was sent; the operation stays `Idle`.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Another transaction of this operation is still pending")]
    InProgress,

    #[error("This operation already completed")]
    AlreadyCompleted,

    /// A read or write failed; the operation is `Failed` and may be rerun.
    #[error("{message}")]
    Failed {
        message: UserMessage,
        source: CallError,
    },
}

impl FlowError {
    pub fn user_message(&self, translator: &ErrorTranslator) -> UserMessage {
        match self {
            Self::Validation(error) => translator.translate_validation(error),
            Self::InProgress => UserMessage::new(ErrorCategory::Submission, self.to_string()),
            Self::AlreadyCompleted => UserMessage::new(ErrorCategory::Validation, self.to_string()),
            Self::Failed { message, .. } => message.clone(),
        }
    }
}

/// What a finished flow did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowOutcome {
    /// Last confirmed write, `None` if nothing needed writing.
    pub transaction: Option<TransactionId>,
    pub reconciled: Reconciled,
}

impl FlowOutcome {
    pub(crate) const fn nothing_to_do() -> Self {
        Self {
            transaction: None,
            reconciled: Reconciled::Visible { attempts: 0 },
        }
    }
}

// ============================================================================
// TransactionOrchestrator
// ============================================================================

#[derive(Clone, Copy, Debug, Default)]
pub struct TransactionOrchestrator {
    fees: FeeEstimator,
    translator: ErrorTranslator,
    reconciler: Reconciler,
}

impl TransactionOrchestrator {
    pub const fn new(fees: FeeEstimator, translator: ErrorTranslator, reconciler: Reconciler) -> Self {
        Self {
            fees,
            translator,
            reconciler,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            FeeEstimator::new(config.fees),
            ErrorTranslator,
            Reconciler::new(config.reconcile),
        )
    }

    pub const fn fees(&self) -> &FeeEstimator {
        &self.fees
    }

    pub const fn translator(&self) -> &ErrorTranslator {
        &self.translator
    }

    pub const fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Fresh fees, then submit. Leaves `operation` in `Confirming(step, tx)`.
    pub(crate) async fn submit_step<C>(
        &self,
        chain: &C,
        operation: &mut Operation,
        step: FlowStep,
        call: ContractCall,
    ) -> Result<TransactionId, FlowError>
    where
        C: TozlowChain + ?Sized,
    {
        operation.submitting(step);
        let fees = self.fees.estimate(chain).await;
        info!(
            operation = operation.name(),
            function = call.function_name(),
            max_fee_per_gas = ?fees.max_fee_per_gas,
            max_priority_fee_per_gas = ?fees.max_priority_fee_per_gas,
            "Sending transaction"
        );

        match chain.submit(TransactionData::new(call, fees)).await {
            Ok(tx) => {
                operation.confirming(step, tx);
                Ok(tx)
            }
            Err(error) => Err(self.fail(operation, error)),
        }
    }

    pub(crate) async fn confirm<C>(
        &self,
        chain: &C,
        operation: &mut Operation,
        tx: &TransactionId,
    ) -> Result<Receipt, FlowError>
    where
        C: TozlowChain + ?Sized,
    {
        match chain.wait_for_confirmation(tx).await {
            Ok(receipt) => {
                info!(
                    operation = operation.name(),
                    %tx,
                    block = receipt.block_number,
                    gas_used = receipt.gas_used,
                    "Confirmed"
                );
                Ok(receipt)
            }
            Err(error) => Err(self.fail(operation, error)),
        }
    }

    /// Translate, mark the operation failed, and build the error.
    pub(crate) fn fail(&self, operation: &mut Operation, error: impl Into<CallError>) -> FlowError {
        let source = error.into();
        let message = self.translator.translate(&source);
        operation.fail(message.clone());
        FlowError::Failed { message, source }
    }
}
