//! Arbitrum client implementation.
//!
//! Reads go through `eth_call` against the configured contracts; writes are
//! signed locally by the configured key, carry the caller's EIP-1559 bid, and
//! are confirmed by polling for the receipt.

use std::time::Instant;

use alloy::contract::{CallBuilder, CallDecoder};
use alloy::eips::BlockNumberOrTag;
use alloy::network::ReceiptResponse;
use alloy::primitives::U256;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use tracing::{debug, info};

use client_blockchain_core::{
    BlockHeader, CallError, ChainConfig, ChainTransport, ContractCall, FeeParams, Receipt,
    SessionReader, TokenReader, TozlowChain, TransactionData, TransactionId, TransportError,
};
use session_core::{Address, Session, SessionId};

use crate::config::{ArbitrumConfig, ConfigError};
use crate::contracts::{IERC20, ITozlowSession};
use crate::convert::{
    classify_call_error, classify_read_error, classify_rpc_error, from_evm_address,
    to_evm_address, to_transaction_id, to_tx_hash, u256_to_u64, u256_to_u128,
};

/// Arbitrum client for the session contract and its stablecoin.
pub struct ArbitrumClient {
    config: ArbitrumConfig,
    provider: DynProvider,
    session: ITozlowSession::ITozlowSessionInstance<DynProvider>,
    token: IERC20::IERC20Instance<DynProvider>,
    account: Address,
    contract_address: Address,
    token_address: Address,
    can_sign: bool,
}

impl ArbitrumClient {
    /// Create a new Arbitrum client.
    ///
    /// No network round trip happens here; call
    /// [`ChainTransport::health_check`] to verify the endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid.
    pub fn new(config: ArbitrumConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError::Invalid)?;

        let contract_address = config.get_contract_address()?;
        let token_address = config.get_usdc_address()?;
        let url: Url = config
            .get_rpc_url()
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("Invalid RPC URL: {e}")))?;

        let (provider, account, can_sign) = match config.private_key.as_deref() {
            Some(key) => {
                let signer: PrivateKeySigner = key
                    .parse()
                    .map_err(|e| ConfigError::Invalid(format!("Invalid private key: {e}")))?;
                let account = from_evm_address(signer.address());
                let provider = ProviderBuilder::new().wallet(signer).connect_http(url).erased();
                (provider, account, true)
            }
            None => {
                let provider = ProviderBuilder::new().connect_http(url).erased();
                (provider, config.account.unwrap_or(Address::ZERO), false)
            }
        };

        let session = ITozlowSession::new(to_evm_address(contract_address), provider.clone());
        let token = IERC20::new(to_evm_address(token_address), provider.clone());

        info!(
            network = config.network_name(),
            rpc = config.get_rpc_url(),
            contract = %contract_address,
            usdc = %token_address,
            %account,
            can_sign,
            "Arbitrum client ready"
        );

        Ok(Self {
            config,
            provider,
            session,
            token,
            account,
            contract_address,
            token_address,
            can_sign,
        })
    }

    pub fn config(&self) -> &ArbitrumConfig {
        &self.config
    }

    pub fn can_sign(&self) -> bool {
        self.can_sign
    }
}

fn with_fees<P, D>(call: CallBuilder<P, D>, fees: FeeParams) -> CallBuilder<P, D>
where
    P: Provider,
    D: CallDecoder,
{
    let call = match fees.max_fee_per_gas {
        Some(max_fee) => call.max_fee_per_gas(max_fee),
        None => call,
    };
    match fees.max_priority_fee_per_gas {
        Some(tip) => call.max_priority_fee_per_gas(tip),
        None => call,
    }
}

async fn send<P, D>(call: CallBuilder<P, D>, fees: FeeParams) -> Result<TransactionId, CallError>
where
    P: Provider,
    D: CallDecoder,
{
    let pending = with_fees(call, fees).send().await.map_err(classify_call_error)?;
    Ok(to_transaction_id(*pending.tx_hash()))
}

#[async_trait]
impl ChainTransport for ArbitrumClient {
    async fn latest_block(&self) -> Result<BlockHeader, TransportError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await
            .map_err(classify_rpc_error)?
            .ok_or_else(|| TransportError::InvalidResponse("latest block missing".into()))?;

        Ok(BlockHeader {
            number: block.header.number,
            timestamp: block.header.timestamp,
            base_fee_per_gas: block.header.base_fee_per_gas.map(u128::from),
        })
    }

    async fn submit(&self, tx: TransactionData) -> Result<TransactionId, CallError> {
        if !self.can_sign {
            return Err(CallError::Rejected(
                "No private key configured (set TOZLOW_PRIVATE_KEY)".into(),
            ));
        }

        let TransactionData { call, fees } = tx;
        let function = call.function_name();
        let target = if call.targets_token() {
            self.token_address
        } else {
            self.contract_address
        };

        let result = match call {
            ContractCall::Approve { spender, amount } => {
                send(
                    self.token.approve(to_evm_address(spender), U256::from(amount)),
                    fees,
                )
                .await
            }
            ContractCall::Deposit { session_id } => {
                send(self.session.deposit(U256::from(session_id.0)), fees).await
            }
            ContractCall::CastVote {
                session_id,
                suspect,
            } => {
                send(
                    self.session
                        .castVote(U256::from(session_id.0), to_evm_address(suspect)),
                    fees,
                )
                .await
            }
            ContractCall::FinalizeSession { session_id } => {
                send(self.session.finalizeSession(U256::from(session_id.0)), fees).await
            }
            ContractCall::CreateSession {
                amount_per_person,
                deadline,
                voting_period,
                participants,
            } => {
                let participants = participants.into_iter().map(to_evm_address).collect();
                send(
                    self.session.createSession(
                        U256::from(amount_per_person),
                        U256::from(deadline),
                        U256::from(voting_period),
                        participants,
                    ),
                    fees,
                )
                .await
            }
        };

        match &result {
            Ok(tx) => info!(function, %target, %tx, "Transaction sent"),
            Err(error) => debug!(function, %target, %error, "Transaction not sent"),
        }
        result
    }

    async fn wait_for_confirmation(&self, tx: &TransactionId) -> Result<Receipt, CallError> {
        let hash = to_tx_hash(tx);
        let started = Instant::now();

        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| CallError::Transport(classify_rpc_error(e)))?;

            if let Some(receipt) = receipt {
                if !receipt.status() {
                    return Err(CallError::FailedOnChain(*tx));
                }
                return Ok(Receipt {
                    transaction_id: *tx,
                    block_number: receipt.block_number().unwrap_or_default(),
                    gas_used: receipt.gas_used(),
                });
            }

            if started.elapsed() >= self.config.receipt_timeout {
                return Err(CallError::Other(format!(
                    "Timed out after {}s waiting for {tx}",
                    self.config.receipt_timeout.as_secs()
                )));
            }
            debug!(%tx, "Receipt not available yet");
            tokio::time::sleep(self.config.receipt_poll_interval).await;
        }
    }

    fn account(&self) -> Address {
        self.account
    }

    async fn health_check(&self) -> Result<(), TransportError> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(classify_rpc_error)?;
        let expected = self.config.network.chain_id();
        if chain_id != expected {
            return Err(TransportError::ConfigError(format!(
                "Connected to chain {chain_id}, expected {expected} ({})",
                self.config.network_name()
            )));
        }

        let usdc = self
            .session
            .usdcAddress()
            .call()
            .await
            .map_err(classify_read_error)?;
        let usdc = from_evm_address(usdc);
        if usdc != self.token_address {
            return Err(TransportError::ConfigError(format!(
                "Contract escrows {usdc}, but the configured USDC is {}",
                self.token_address
            )));
        }

        debug!(chain_id, "Health check passed");
        Ok(())
    }
}

#[async_trait]
impl SessionReader for ArbitrumClient {
    async fn session_count(&self) -> Result<u64, TransportError> {
        let count = self
            .session
            .sessionCount()
            .call()
            .await
            .map_err(classify_read_error)?;
        u256_to_u64(count, "session count")
    }

    async fn get_session(&self, id: SessionId) -> Result<Session, TransportError> {
        let raw = self
            .session
            .getSession(U256::from(id.0))
            .call()
            .await
            .map_err(classify_read_error)?;

        // Unused ids read back as zeroed storage.
        let host = from_evm_address(raw.host);
        if host.is_zero() {
            return Err(TransportError::InvalidResponse(format!(
                "session {id} does not exist"
            )));
        }

        let participant_count = u8::try_from(u256_to_u64(raw.participantCount, "participant count")?)
            .map_err(|_| TransportError::InvalidResponse("participant count out of range".into()))?;

        Ok(Session {
            id,
            host,
            amount_per_person: u256_to_u128(raw.amount, "amount")?,
            deadline: u256_to_u64(raw.deadline, "deadline")?,
            voting_period: u256_to_u64(raw.votingPeriod, "voting period")?,
            finalized: raw.finalized,
            active: raw.active,
            participant_count,
        })
    }

    async fn participant_at(&self, id: SessionId, index: u8) -> Result<Address, TransportError> {
        let participant = self
            .session
            .getParticipantAt(U256::from(id.0), U256::from(index))
            .call()
            .await
            .map_err(classify_read_error)?;
        Ok(from_evm_address(participant))
    }

    async fn has_deposited(&self, id: SessionId, who: Address) -> Result<bool, TransportError> {
        self.session
            .hasDeposited(U256::from(id.0), to_evm_address(who))
            .call()
            .await
            .map_err(classify_read_error)
    }

    async fn has_voted(&self, id: SessionId, who: Address) -> Result<bool, TransportError> {
        self.session
            .hasVoted(U256::from(id.0), to_evm_address(who))
            .call()
            .await
            .map_err(classify_read_error)
    }

    async fn absence_vote_count(&self, id: SessionId, who: Address) -> Result<u64, TransportError> {
        let votes = self
            .session
            .absenceVoteCount(U256::from(id.0), to_evm_address(who))
            .call()
            .await
            .map_err(classify_read_error)?;
        u256_to_u64(votes, "absence votes")
    }
}

#[async_trait]
impl TokenReader for ArbitrumClient {
    async fn allowance(&self, owner: Address, spender: Address) -> Result<u128, TransportError> {
        let allowance = self
            .token
            .allowance(to_evm_address(owner), to_evm_address(spender))
            .call()
            .await
            .map_err(classify_read_error)?;
        // Unlimited approvals are common; anything above u128 covers every stake.
        Ok(u128::try_from(allowance).unwrap_or(u128::MAX))
    }

    async fn balance_of(&self, owner: Address) -> Result<u128, TransportError> {
        let balance = self
            .token
            .balanceOf(to_evm_address(owner))
            .call()
            .await
            .map_err(classify_read_error)?;
        u256_to_u128(balance, "balance")
    }
}

impl TozlowChain for ArbitrumClient {
    fn name(&self) -> &str {
        "Arbitrum"
    }

    fn network(&self) -> &str {
        self.config.network_name()
    }

    fn contract_address(&self) -> Address {
        self.contract_address
    }

    fn token_address(&self) -> Address {
        self.token_address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTRACT: &str = "0x1111111111111111111111111111111111111111";

    fn config() -> ArbitrumConfig {
        ArbitrumConfig::default()
            .with_rpc_url("http://127.0.0.1:1")
            .with_contract_address(CONTRACT.parse().unwrap())
    }

    #[test]
    fn read_only_without_key() {
        let client = ArbitrumClient::new(config()).unwrap();
        assert!(!client.can_sign());
        assert_eq!(client.account(), Address::ZERO);
        assert_eq!(client.network(), "arbitrum-sepolia");
        assert_eq!(client.contract_address(), CONTRACT.parse().unwrap());
    }

    #[test]
    fn account_comes_from_key() {
        // Well-known first dev account of anvil/hardhat.
        let key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let client = ArbitrumClient::new(config().with_private_key(key)).unwrap();
        assert!(client.can_sign());
        assert_eq!(
            client.account(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
        );
    }

    #[test]
    fn missing_contract_is_rejected() {
        let config = ArbitrumConfig::default();
        assert!(ArbitrumClient::new(config).is_err());
    }

    #[tokio::test]
    async fn writes_need_a_key() {
        let client = ArbitrumClient::new(config()).unwrap();
        let err = client
            .submit(TransactionData::new(
                ContractCall::Deposit {
                    session_id: SessionId(0),
                },
                FeeParams::default(),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Rejected(_)));
    }
}
