//! Arbitrum integration for the Tozlow client.
//!
//! This crate implements the `client-blockchain-core` traits over an EVM
//! JSON-RPC endpoint:
//! - Contract bindings for the session contract and the USDC token
//! - Local signing with EIP-1559 fee fields supplied by the caller
//! - Receipt polling for confirmations
//! - Decoding of contract reverts into [`client_blockchain_core::RevertReason`]
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_arbitrum::{ArbitrumClient, ArbitrumConfig};
//! use client_blockchain_core::SessionReader;
//!
//! let config = ArbitrumConfig::from_env()?;
//! let client = ArbitrumClient::new(config)?;
//!
//! // Use chain-agnostic interface
//! let count = client.session_count().await?;
//! ```

pub mod client;
pub mod config;
pub mod contracts;
pub mod convert;

pub use client::ArbitrumClient;
pub use config::{ArbitrumConfig, ArbitrumNetwork, ConfigError};
