//! Tozlow client binary.
//!
//! Composition root: loads configuration from the environment, sets up
//! logging, connects the Arbitrum adapter and hands it to one command.
//!
//! # Examples
//!
//! ```bash
//! # Sessions the configured account takes part in
//! tozlow sessions
//!
//! # Host a session: 5 USDC each, two hours from now, one hour of voting
//! tozlow create --amount 5 --deadline +2h --voting-minutes 60 \
//!     --participant 0x... --participant 0x...
//!
//! # Join, vote, settle
//! tozlow deposit 3
//! tozlow vote 3 0x...
//! tozlow finalize 3
//! ```

mod commands;
mod dirs;
mod logging;

use anyhow::{Context as _, Result};
use clap::Parser;
use client_blockchain_arbitrum::{ArbitrumClient, ArbitrumConfig};
use client_blockchain_core::ChainConfig;
use client_core::ClientConfig;
use commands::{Context, Create, Deposit, Fees, Finalize, Sessions, Show, Status, Vote};

/// Attendance deposits for meetups, settled on Arbitrum
#[derive(Parser)]
#[command(name = "tozlow")]
#[command(about = "Attendance deposits for meetups, settled on Arbitrum", long_about = None)]
#[command(version)]
struct Cli {
    /// Also print info-level logs to stderr (repeat for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List sessions the account takes part in
    Sessions(Sessions),

    /// Show one session with every participant's flags
    Show(Show),

    /// Host a new session
    Create(Create),

    /// Approve the stablecoin if needed and deposit
    Deposit(Deposit),

    /// Vote a participant absent
    Vote(Vote),

    /// Settle a session after its voting window
    Finalize(Finalize),

    /// Show the fee bid the next write would carry
    Fees(Fees),

    /// Check the endpoint, contracts and account balance
    Status(Status),
}

impl Command {
    const fn needs_signer(&self) -> bool {
        matches!(
            self,
            Self::Create(_) | Self::Deposit(_) | Self::Vote(_) | Self::Finalize(_)
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // 1. Load configuration from environment
    let client_config = ClientConfig::from_env();
    let chain_config = ArbitrumConfig::from_env().context("Failed to load chain configuration")?;

    // 2. Setup logging (the guard flushes the file writer on exit)
    let _guard = logging::setup_logging(client_config.log_dir.as_deref(), cli.verbose)?;

    tracing::info!("Starting tozlow");
    tracing::info!("Network: {}", chain_config.network_name());

    // 3. Connect the chain adapter
    let chain = ArbitrumClient::new(chain_config).context("Failed to initialize Arbitrum client")?;
    if cli.command.needs_signer() && !chain.can_sign() {
        anyhow::bail!("TOZLOW_PRIVATE_KEY is required for this command");
    }

    // 4. Run the command
    let ctx = Context::new(chain, &client_config);
    match cli.command {
        Command::Sessions(cmd) => cmd.execute(&ctx).await,
        Command::Show(cmd) => cmd.execute(&ctx).await,
        Command::Create(cmd) => cmd.execute(&ctx).await,
        Command::Deposit(cmd) => cmd.execute(&ctx).await,
        Command::Vote(cmd) => cmd.execute(&ctx).await,
        Command::Finalize(cmd) => cmd.execute(&ctx).await,
        Command::Fees(cmd) => cmd.execute(&ctx).await,
        Command::Status(cmd) => cmd.execute(&ctx).await,
    }
}
