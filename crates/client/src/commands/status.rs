//! Endpoint and account status.

use anyhow::Result;
use clap::Parser;
use client_blockchain_core::TozlowChain;
use console::style;
use session_core::format_usdc;

use super::Context;

/// Check the endpoint and contracts, then show the account's balance
#[derive(Parser, Debug)]
pub struct Status {}

impl Status {
    pub async fn execute<C: TozlowChain>(self, ctx: &Context<C>) -> Result<()> {
        let chain = ctx.chain();
        chain.health_check().await.map_err(|e| ctx.read_error(e))?;
        println!("{} Connected", style("✓").green().bold());

        let account = chain.account();
        if account.is_zero() {
            println!("No account configured (set TOZLOW_PRIVATE_KEY or TOZLOW_ACCOUNT)");
            return Ok(());
        }

        let balance = chain.balance_of(account).await.map_err(|e| ctx.read_error(e))?;
        println!("account  {account}");
        println!("balance  {} USDC", format_usdc(balance));
        Ok(())
    }
}
