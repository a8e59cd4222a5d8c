//! Blockchain abstraction layer for the Tozlow client.
//!
//! This crate provides a layered view of the session contract and the
//! stablecoin it escrows.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: TozlowChain (composite trait)
//!          ├── SessionReader
//!          └── TokenReader
//!
//! Layer 1: Domain Traits (session and token reads)
//!
//! Layer 0: ChainTransport (blocks, submission, confirmation)
//! ```
//!
//! # Design Philosophy
//!
//! - **Layer 0 (Transport)**: Pure chain operations, no session knowledge
//! - **Layer 1 (Domain)**: Contract view calls, one method per view
//! - **Layer 2 (Composite)**: Everything the orchestrator needs from one handle
//!
//! Writes are described as data ([`ContractCall`]) and pushed through the
//! transport, so the orchestrator never needs adapter-specific builders.
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_core::{ContractCall, FeeParams, TozlowChain, TransactionData};
//!
//! async fn deposit(chain: &dyn TozlowChain, id: SessionId) {
//!     let call = ContractCall::Deposit { session_id: id };
//!     let tx = chain.submit(TransactionData::new(call, FeeParams::default())).await?;
//!     chain.wait_for_confirmation(&tx).await?;
//! }
//! ```

pub mod revert;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export all traits
pub use traits::{
    CallError, ChainTransport, SessionReader, TokenReader, TozlowChain, TransportError,
};

// Re-export all types
pub use revert::RevertReason;
pub use types::{
    BlockHeader, ChainConfig, ContractCall, FeeParams, Receipt, TransactionData, TransactionId,
};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockChain, SubmittedCall};
