//! Command implementations.
//!
//! Each command is a separate module that implements its own CLI args and
//! execution logic against a shared [`Context`].

mod create;
mod deposit;
mod fees;
mod finalize;
mod render;
mod sessions;
mod show;
mod status;
mod vote;

use std::time::{SystemTime, UNIX_EPOCH};

use client_blockchain_core::{TozlowChain, TransportError};
use client_core::{ClientConfig, FlowError, FlowOutcome, SessionCatalog, TransactionOrchestrator};
use console::style;
use tracing::{debug, warn};

pub use create::Create;
pub use deposit::Deposit;
pub use fees::Fees;
pub use finalize::Finalize;
pub use sessions::Sessions;
pub use show::Show;
pub use status::Status;
pub use vote::Vote;

/// Chain handle plus the client services every command shares.
pub struct Context<C> {
    chain: C,
    orchestrator: TransactionOrchestrator,
    catalog: SessionCatalog,
}

impl<C: TozlowChain> Context<C> {
    pub fn new(chain: C, config: &ClientConfig) -> Self {
        Self {
            chain,
            orchestrator: TransactionOrchestrator::from_config(config),
            catalog: SessionCatalog::default(),
        }
    }

    pub fn chain(&self) -> &C {
        &self.chain
    }

    pub fn orchestrator(&self) -> &TransactionOrchestrator {
        &self.orchestrator
    }

    pub fn catalog(&self) -> &SessionCatalog {
        &self.catalog
    }

    /// Current time as the contract sees it.
    ///
    /// Uses the latest block timestamp so local clock skew cannot make a
    /// client-side check disagree with the contract; falls back to the local
    /// clock when the block cannot be read.
    pub async fn now(&self) -> u64 {
        match self.chain.latest_block().await {
            Ok(block) => block.timestamp,
            Err(error) => {
                warn!(%error, "Using the local clock");
                wall_clock()
            }
        }
    }

    /// Turn a failed flow into the message shown to the user.
    pub fn flow_error(&self, error: FlowError) -> anyhow::Error {
        debug!(?error, "Flow failed");
        let message = error.user_message(self.orchestrator.translator());
        anyhow::anyhow!(message.text)
    }

    /// Turn a failed read into the message shown to the user.
    pub fn read_error(&self, error: TransportError) -> anyhow::Error {
        debug!(?error, "Read failed");
        let message = self.orchestrator.translator().translate_transport(&error);
        anyhow::anyhow!(message.text)
    }
}

fn wall_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

/// Print what a write flow did.
fn report(what: &str, outcome: &FlowOutcome) {
    match outcome.transaction {
        None => println!("{} {what}: nothing to do", style("·").dim()),
        Some(tx) => println!("{} {what} confirmed in {tx}", style("✓").green().bold()),
    }
    if outcome.transaction.is_some() && !outcome.reconciled.is_visible() {
        println!(
            "{} The node has not caught up yet; the change may take a moment to show.",
            style("!").yellow().bold()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_blockchain_core::MockChain;
    use client_core::ReconcileConfig;
    use session_core::{Address, Session, SessionId};
    use std::time::Duration;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn context(chain: MockChain) -> Context<MockChain> {
        let config =
            ClientConfig::default().with_reconcile(ReconcileConfig::new(2, Duration::from_millis(1)));
        Context::new(chain, &config)
    }

    fn open_session(chain: &MockChain) -> SessionId {
        chain.insert_session(
            Session {
                id: SessionId(0),
                host: addr(1),
                amount_per_person: 1_000_000,
                deadline: 5_000,
                voting_period: 3_600,
                finalized: false,
                active: false,
                participant_count: 0,
            },
            vec![addr(1), addr(2), addr(3)],
        )
    }

    #[tokio::test]
    async fn now_follows_the_chain() {
        let chain = MockChain::new(addr(1));
        chain.set_time(1_234);
        let ctx = context(chain.clone());
        assert_eq!(ctx.now().await, 1_234);

        chain.fail_block_reads(true);
        assert!(ctx.now().await > 1_234);
    }

    #[tokio::test]
    async fn deposit_command_runs_the_flow() {
        let chain = MockChain::new(addr(2));
        chain.set_time(100);
        chain.mint(addr(2), 5_000_000);
        let id = open_session(&chain);
        let ctx = context(chain.clone());

        Deposit { id: id.0 }.execute(&ctx).await.unwrap();

        assert_eq!(chain.submitted_named("approve"), 1);
        assert_eq!(chain.submitted_named("deposit"), 1);
    }

    #[tokio::test]
    async fn failed_flows_surface_user_text() {
        let chain = MockChain::new(addr(2));
        chain.set_time(100);
        let id = open_session(&chain);
        let ctx = context(chain.clone());

        let err = Finalize { id: id.0 }.execute(&ctx).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Session cannot be finalized before voting ends at 8600"
        );
        assert!(chain.submitted().is_empty());
    }

    #[tokio::test]
    async fn late_deposit_is_refused_before_approval() {
        let chain = MockChain::new(addr(2));
        chain.set_time(6_000);
        chain.mint(addr(2), 5_000_000);
        let id = open_session(&chain);
        let ctx = context(chain.clone());

        let err = Deposit { id: id.0 }.execute(&ctx).await.unwrap_err();

        assert_eq!(err.to_string(), "Deposits closed at the meeting date (5000)");
        assert!(chain.submitted().is_empty());
    }
}
