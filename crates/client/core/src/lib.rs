//! Chain-agnostic orchestration for the Tozlow client.
//!
//! Everything here talks to the chain through the traits of
//! `client-blockchain-core` and takes the current time as an argument, so it
//! runs unchanged against the Arbitrum adapter or the in-memory mock.
//!
//! - [`catalog`] and [`participants`] build read-only session views.
//! - [`orchestrator`] sequences writes (deposit, vote, finalize, create).
//! - [`fees`], [`translate`] and [`reconcile`] are the stateless helpers each
//!   flow leans on.
pub mod catalog;
pub mod config;
pub mod fees;
pub mod orchestrator;
pub mod participants;
pub mod reconcile;
pub mod translate;

pub use catalog::{SessionCatalog, SessionDetail};
pub use config::ClientConfig;
pub use fees::{FeeEstimator, FeePolicy};
pub use orchestrator::{
    CreateSessionFlow, CreatedSession, DepositFlow, FinalizeFlow, FlowError, FlowOutcome,
    FlowStep, Operation, OperationState, TransactionOrchestrator, VoteFlow,
};
pub use participants::ParticipantSetLoader;
pub use reconcile::{ReconcileConfig, Reconciled, Reconciler};
pub use translate::{ErrorCategory, ErrorTranslator, UserMessage, revert_message};
