//! Vote a participant absent.

use anyhow::Result;
use clap::Parser;
use client_blockchain_core::TozlowChain;
use client_core::VoteFlow;
use session_core::{Address, SessionId};

use super::{Context, report};

/// Vote a participant absent during the voting window
#[derive(Parser, Debug)]
pub struct Vote {
    /// Session id
    pub id: u64,

    /// Participant who did not show up
    pub suspect: Address,
}

impl Vote {
    pub async fn execute<C: TozlowChain>(self, ctx: &Context<C>) -> Result<()> {
        let now = ctx.now().await;
        let outcome = VoteFlow::new(SessionId(self.id), self.suspect)
            .run(ctx.chain(), ctx.orchestrator(), now)
            .await
            .map_err(|e| ctx.flow_error(e))?;

        report("cast-vote", &outcome);
        Ok(())
    }
}
