//! Chain abstraction traits.
//!
//! This module defines a layered abstraction:
//! - Layer 0: ChainTransport (pure infrastructure)
//! - Layer 1: SessionReader, TokenReader (contract views)
//! - Layer 2: TozlowChain (composite trait)

use async_trait::async_trait;
use session_core::{Address, Session, SessionId};

use crate::revert::RevertReason;
use crate::types::{BlockHeader, Receipt, TransactionData, TransactionId};

// ============================================================================
// Error Types
// ============================================================================

/// Transport layer errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Write errors: everything that can go wrong between building a call and
/// seeing it confirmed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error("Contract reverted: {0}")]
    Revert(RevertReason),

    #[error("Contract reverted: {0}")]
    UnknownRevert(String),

    #[error("Rejected by signer: {0}")]
    Rejected(String),

    #[error("Transaction {0} was included but failed")]
    FailedOnChain(TransactionId),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("{0}")]
    Other(String),
}

// ============================================================================
// Layer 0: Pure Infrastructure
// ============================================================================

/// Pure chain infrastructure layer.
///
/// This trait provides block reads and transaction lifecycle without any
/// knowledge of sessions.
#[async_trait]
pub trait ChainTransport: Send + Sync {
    /// Header of the latest block.
    async fn latest_block(&self) -> Result<BlockHeader, TransportError>;

    /// Sign and broadcast a write. Returns once the node accepted it.
    async fn submit(&self, tx: TransactionData) -> Result<TransactionId, CallError>;

    /// Wait until the transaction is included.
    ///
    /// The trait imposes no timeout. Adapters bound the wait themselves and
    /// return an error when the wait expires.
    async fn wait_for_confirmation(&self, tx: &TransactionId) -> Result<Receipt, CallError>;

    /// Account that signs writes and whose sessions are listed.
    fn account(&self) -> Address;

    /// Health check: verify connection to the expected chain.
    async fn health_check(&self) -> Result<(), TransportError>;
}

// ============================================================================
// Layer 1: Contract Views
// ============================================================================

/// Read-only views of the session contract.
#[async_trait]
pub trait SessionReader: Send + Sync {
    /// Number of sessions ever created (ids are `0..count`).
    async fn session_count(&self) -> Result<u64, TransportError>;

    async fn get_session(&self, id: SessionId) -> Result<Session, TransportError>;

    async fn participant_at(&self, id: SessionId, index: u8) -> Result<Address, TransportError>;

    async fn has_deposited(&self, id: SessionId, who: Address) -> Result<bool, TransportError>;

    async fn has_voted(&self, id: SessionId, who: Address) -> Result<bool, TransportError>;

    async fn absence_vote_count(&self, id: SessionId, who: Address) -> Result<u64, TransportError>;
}

/// Read-only views of the stablecoin (ERC-20).
#[async_trait]
pub trait TokenReader: Send + Sync {
    async fn allowance(&self, owner: Address, spender: Address) -> Result<u128, TransportError>;

    async fn balance_of(&self, owner: Address) -> Result<u128, TransportError>;
}

// ============================================================================
// Layer 2: Composite Trait
// ============================================================================

/// Everything the session client needs from one chain handle.
pub trait TozlowChain: ChainTransport + SessionReader + TokenReader + Send + Sync {
    /// Get the chain name (e.g., "Arbitrum").
    fn name(&self) -> &str;

    /// Get the network name (e.g., "sepolia", "one", "local").
    fn network(&self) -> &str;

    /// Address of the session contract (the spender for approvals).
    fn contract_address(&self) -> Address;

    /// Address of the stablecoin.
    fn token_address(&self) -> Address;
}
