//! Conversions between alloy types and the chain-agnostic client types,
//! and classification of RPC and contract errors.

use alloy::primitives::{Address as EvmAddress, B256, U256};
use alloy::sol_types::{Revert, SolError, SolInterface};
use alloy::transports::{RpcError, TransportErrorKind};
use client_blockchain_core::{CallError, RevertReason, TransactionId, TransportError};
use session_core::Address;

use crate::contracts::ITozlowSession::ITozlowSessionErrors;

pub fn to_evm_address(address: Address) -> EvmAddress {
    EvmAddress::from(address.0)
}

pub fn from_evm_address(address: EvmAddress) -> Address {
    Address::from_bytes(address.0.0)
}

pub fn to_transaction_id(hash: B256) -> TransactionId {
    TransactionId::from_bytes(hash.0)
}

pub fn to_tx_hash(id: &TransactionId) -> B256 {
    B256::from(*id.as_bytes())
}

pub fn u256_to_u64(value: U256, what: &str) -> Result<u64, TransportError> {
    u64::try_from(value)
        .map_err(|_| TransportError::InvalidResponse(format!("{what} out of range: {value}")))
}

pub fn u256_to_u128(value: U256, what: &str) -> Result<u128, TransportError> {
    u128::try_from(value)
        .map_err(|_| TransportError::InvalidResponse(format!("{what} out of range: {value}")))
}

/// Decode revert data into a contract error, if it is one.
pub fn decode_revert(data: &[u8]) -> Option<RevertReason> {
    let decoded = ITozlowSessionErrors::abi_decode(data).ok()?;
    Some(match decoded {
        ITozlowSessionErrors::AlreadyInitialized(_) => RevertReason::AlreadyInitialized,
        ITozlowSessionErrors::NotParticipant(_) => RevertReason::NotParticipant,
        ITozlowSessionErrors::AlreadyDeposited(_) => RevertReason::AlreadyDeposited,
        ITozlowSessionErrors::DeadlineNotReached(_) => RevertReason::DeadlineNotReached,
        ITozlowSessionErrors::DeadlineReached(_) => RevertReason::DeadlineReached,
        ITozlowSessionErrors::AlreadyFinalized(_) => RevertReason::AlreadyFinalized,
        ITozlowSessionErrors::NotEnoughParticipants(_) => RevertReason::NotEnoughParticipants,
        ITozlowSessionErrors::TooManyParticipants(_) => RevertReason::TooManyParticipants,
        ITozlowSessionErrors::TransferFailed(_) => RevertReason::TransferFailed,
        ITozlowSessionErrors::AlreadyVoted(_) => RevertReason::AlreadyVoted,
        ITozlowSessionErrors::InvalidAbsent(_) => RevertReason::InvalidAbsent,
        ITozlowSessionErrors::NotAllDeposited(_) => RevertReason::NotAllDeposited,
        ITozlowSessionErrors::VotingNotOpen(_) => RevertReason::VotingNotOpen,
        ITozlowSessionErrors::VotingClosed(_) => RevertReason::VotingClosed,
        ITozlowSessionErrors::SessionNotActive(_) => RevertReason::SessionNotActive,
        ITozlowSessionErrors::CannotVoteSelf(_) => RevertReason::CannotVoteSelf,
    })
}

/// Revert data that is not one of the contract's errors.
pub fn describe_unknown_revert(data: &[u8]) -> String {
    if let Ok(revert) = Revert::abi_decode(data) {
        return revert.reason;
    }
    match data.get(..4) {
        Some(selector) => format!("selector 0x{}", hex::encode(selector)),
        None if data.is_empty() => "no revert data".to_string(),
        None => format!("0x{}", hex::encode(data)),
    }
}

/// Classify a failed write (estimation, signing or broadcast).
pub fn classify_call_error(error: alloy::contract::Error) -> CallError {
    if let Some(data) = error.as_revert_data() {
        return match decode_revert(&data) {
            Some(reason) => CallError::Revert(reason),
            None => CallError::UnknownRevert(describe_unknown_revert(&data)),
        };
    }

    match error {
        alloy::contract::Error::TransportError(rpc) => classify_rpc_call_error(rpc),
        other => CallError::Other(other.to_string()),
    }
}

fn classify_rpc_call_error(error: RpcError<TransportErrorKind>) -> CallError {
    match error {
        // Signer failures surface as local usage errors.
        RpcError::LocalUsageError(inner) => CallError::Rejected(inner.to_string()),
        other => CallError::Transport(classify_rpc_error(other)),
    }
}

/// Classify a failed read or provider call.
pub fn classify_rpc_error(error: RpcError<TransportErrorKind>) -> TransportError {
    match error {
        RpcError::Transport(kind) => TransportError::NetworkError(kind.to_string()),
        RpcError::ErrorResp(payload) => TransportError::RpcError(payload.message.to_string()),
        RpcError::NullResp => TransportError::InvalidResponse("null response".to_string()),
        other => TransportError::RpcError(other.to_string()),
    }
}

/// Classify a failed view call.
pub fn classify_read_error(error: alloy::contract::Error) -> TransportError {
    match error {
        alloy::contract::Error::TransportError(rpc) => classify_rpc_error(rpc),
        other => TransportError::InvalidResponse(other.to_string()),
    }
}
