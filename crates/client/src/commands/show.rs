//! Show one session in full.

use anyhow::Result;
use clap::Parser;
use client_blockchain_core::TozlowChain;
use session_core::SessionId;

use super::{Context, render};

/// Show one session with every participant's flags
#[derive(Parser, Debug)]
pub struct Show {
    /// Session id
    pub id: u64,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl Show {
    pub async fn execute<C: TozlowChain>(self, ctx: &Context<C>) -> Result<()> {
        let now = ctx.now().await;
        let detail = ctx
            .catalog()
            .load_detail(ctx.chain(), SessionId(self.id), now)
            .await
            .map_err(|e| ctx.read_error(e))?;

        if self.json {
            let value = serde_json::json!({
                "summary": detail.summary,
                "participants": detail.statuses,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        for line in render::detail_lines(&detail, ctx.chain().account(), now) {
            println!("{line}");
        }
        Ok(())
    }
}
