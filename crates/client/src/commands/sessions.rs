//! List the account's sessions.

use anyhow::Result;
use clap::Parser;
use client_blockchain_core::TozlowChain;

use super::{Context, render};

/// List sessions the account takes part in, newest first
#[derive(Parser, Debug)]
pub struct Sessions {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl Sessions {
    pub async fn execute<C: TozlowChain>(self, ctx: &Context<C>) -> Result<()> {
        let caller = ctx.chain().account();
        let now = ctx.now().await;
        let sessions = ctx
            .catalog()
            .load_mine(ctx.chain(), caller, now)
            .await
            .map_err(|e| ctx.read_error(e))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&sessions)?);
            return Ok(());
        }

        if sessions.is_empty() {
            println!("No sessions for {caller}");
            return Ok(());
        }
        for summary in &sessions {
            println!("{}", render::summary_line(summary, caller, now));
        }
        Ok(())
    }
}
