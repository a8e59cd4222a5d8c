//! Show the fee bid.

use anyhow::Result;
use clap::Parser;
use client_blockchain_core::TozlowChain;

use super::{Context, render};

/// Show the EIP-1559 bid the next write would carry
#[derive(Parser, Debug)]
pub struct Fees {}

impl Fees {
    pub async fn execute<C: TozlowChain>(self, ctx: &Context<C>) -> Result<()> {
        let fees = ctx.orchestrator().fees().estimate(ctx.chain()).await;

        match (fees.max_fee_per_gas, fees.max_priority_fee_per_gas) {
            (Some(max_fee), Some(priority)) => {
                println!("max fee       {}", render::format_gwei(max_fee));
                println!("priority fee  {}", render::format_gwei(priority));
            }
            _ => println!("Latest block unavailable; the node will choose fees"),
        }
        Ok(())
    }
}
