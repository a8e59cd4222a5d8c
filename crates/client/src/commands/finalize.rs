//! Settle a session.

use anyhow::Result;
use clap::Parser;
use client_blockchain_core::TozlowChain;
use client_core::FinalizeFlow;
use session_core::SessionId;

use super::{Context, report};

/// Settle a session once its voting window has ended
#[derive(Parser, Debug)]
pub struct Finalize {
    /// Session id
    pub id: u64,
}

impl Finalize {
    pub async fn execute<C: TozlowChain>(self, ctx: &Context<C>) -> Result<()> {
        let now = ctx.now().await;
        let outcome = FinalizeFlow::new(SessionId(self.id))
            .run(ctx.chain(), ctx.orchestrator(), now)
            .await
            .map_err(|e| ctx.flow_error(e))?;

        report("finalize-session", &outcome);
        Ok(())
    }
}
