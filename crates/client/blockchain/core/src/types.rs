//! Common types for chain interactions.

use std::fmt;

use session_core::{Address, SessionId};

/// Transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(pub [u8; 32]);

impl TransactionId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// EIP-1559 fee bid attached to a write.
///
/// Both fields empty means "let the node/wallet choose", which is what the
/// fee estimator falls back to when the latest block cannot be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeParams {
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

impl FeeParams {
    pub fn is_empty(&self) -> bool {
        self.max_fee_per_gas.is_none() && self.max_priority_fee_per_gas.is_none()
    }
}

/// A write against the session contract or its token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractCall {
    /// ERC-20 `approve(spender, amount)` on the stablecoin.
    Approve { spender: Address, amount: u128 },

    Deposit { session_id: SessionId },

    CastVote { session_id: SessionId, suspect: Address },

    FinalizeSession { session_id: SessionId },

    CreateSession {
        amount_per_person: u128,
        deadline: u64,
        voting_period: u64,
        participants: Vec<Address>,
    },
}

impl ContractCall {
    /// Solidity function name, for logs.
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::Deposit { .. } => "deposit",
            Self::CastVote { .. } => "castVote",
            Self::FinalizeSession { .. } => "finalizeSession",
            Self::CreateSession { .. } => "createSession",
        }
    }

    /// Whether the call targets the token contract rather than the session contract.
    pub fn targets_token(&self) -> bool {
        matches!(self, Self::Approve { .. })
    }
}

/// Call plus the fee bid computed for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionData {
    pub call: ContractCall,
    pub fees: FeeParams,
}

impl TransactionData {
    pub fn new(call: ContractCall, fees: FeeParams) -> Self {
        Self { call, fees }
    }
}

/// Subset of the latest block header the client cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockHeader {
    pub number: u64,
    pub timestamp: u64,
    /// Absent on pre-London chains or partial RPC responses.
    pub base_fee_per_gas: Option<u128>,
}

/// Inclusion proof of a successful transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_id: TransactionId,
    pub block_number: u64,
    pub gas_used: u64,
}

/// Chain-specific configuration.
///
/// This is a trait to allow each adapter to provide its own config type.
pub trait ChainConfig: Send + Sync {
    /// Human-readable network name (e.g., "arbitrum-sepolia")
    fn network_name(&self) -> &str;

    /// RPC endpoint URL
    fn rpc_url(&self) -> &str;

    /// Validate configuration (e.g., URL format, required addresses)
    fn validate(&self) -> Result<(), String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_id_displays_as_hex() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0xff;
        let id = TransactionId::from_bytes(bytes);
        assert_eq!(id.to_string(), format!("0x{}ff", "00".repeat(31)));
    }

    #[test]
    fn call_metadata() {
        let approve = ContractCall::Approve {
            spender: Address::ZERO,
            amount: 1,
        };
        assert_eq!(approve.function_name(), "approve");
        assert!(approve.targets_token());

        let deposit = ContractCall::Deposit {
            session_id: SessionId(3),
        };
        assert_eq!(deposit.function_name(), "deposit");
        assert!(!deposit.targets_token());
    }

    #[test]
    fn default_fees_are_empty() {
        assert!(FeeParams::default().is_empty());
        assert!(
            !FeeParams {
                max_fee_per_gas: Some(1),
                max_priority_fee_per_gas: None
            }
            .is_empty()
        );
    }
}
