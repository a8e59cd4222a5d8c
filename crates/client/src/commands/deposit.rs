//! Deposit into a session.

use anyhow::Result;
use clap::Parser;
use client_blockchain_core::TozlowChain;
use client_core::DepositFlow;
use session_core::SessionId;

use super::{Context, report};

/// Approve the stablecoin if needed, then deposit
#[derive(Parser, Debug)]
pub struct Deposit {
    /// Session id
    pub id: u64,
}

impl Deposit {
    pub async fn execute<C: TozlowChain>(self, ctx: &Context<C>) -> Result<()> {
        let now = ctx.now().await;
        let outcome = DepositFlow::new(SessionId(self.id))
            .run(ctx.chain(), ctx.orchestrator(), now)
            .await
            .map_err(|e| ctx.flow_error(e))?;

        report("deposit", &outcome);
        Ok(())
    }
}
