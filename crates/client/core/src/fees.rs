//! EIP-1559 fee bids computed from the latest block.
//!
//! Arbitrum's base fee moves between blocks, and a bid copied from an earlier
//! step can fall under it. The estimator is therefore consulted right before
//! every submission instead of once per flow.

use client_blockchain_core::{ChainTransport, FeeParams};
use tracing::{debug, warn};

/// Tunables for [`FeeEstimator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeePolicy {
    /// Tip offered to the sequencer (0.001 gwei by default).
    pub priority_fee_wei: u128,
    /// Base fee assumed when the block header carries none.
    pub fallback_base_fee_wei: u128,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            priority_fee_wei: 1_000_000,
            fallback_base_fee_wei: 20_000_000,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FeeEstimator {
    policy: FeePolicy,
}

impl FeeEstimator {
    pub const fn new(policy: FeePolicy) -> Self {
        Self { policy }
    }

    pub const fn policy(&self) -> &FeePolicy {
        &self.policy
    }

    /// `max_fee = base_fee * 1.5`, priority fee from the policy.
    ///
    /// A failed block read yields empty params so the signer can fill in its
    /// own defaults; it is never an error.
    pub async fn estimate<C>(&self, chain: &C) -> FeeParams
    where
        C: ChainTransport + ?Sized,
    {
        let block = match chain.latest_block().await {
            Ok(block) => block,
            Err(error) => {
                warn!(%error, "Could not read latest block, leaving fees to the signer");
                return FeeParams::default();
            }
        };

        let base_fee = block.base_fee_per_gas.unwrap_or_else(|| {
            debug!(
                block = block.number,
                fallback = self.policy.fallback_base_fee_wei,
                "Block has no base fee, using fallback"
            );
            self.policy.fallback_base_fee_wei
        });

        let params = self.from_base_fee(base_fee);
        debug!(block = block.number, base_fee, ?params, "Estimated fees");
        params
    }

    pub const fn from_base_fee(&self, base_fee: u128) -> FeeParams {
        FeeParams {
            max_fee_per_gas: Some(base_fee.saturating_mul(3) / 2),
            max_priority_fee_per_gas: Some(self.policy.priority_fee_wei),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_blockchain_core::MockChain;
    use session_core::Address;

    #[test]
    fn max_fee_is_one_and_a_half_base_fee() {
        let estimator = FeeEstimator::default();
        let params = estimator.from_base_fee(100_000_000);
        assert_eq!(params.max_fee_per_gas, Some(150_000_000));
        assert_eq!(params.max_priority_fee_per_gas, Some(1_000_000));
    }

    #[test]
    fn odd_base_fee_truncates() {
        let params = FeeEstimator::default().from_base_fee(3);
        assert_eq!(params.max_fee_per_gas, Some(4));
    }

    #[tokio::test]
    async fn reads_base_fee_from_latest_block() {
        let chain = MockChain::new(Address::ZERO);
        chain.set_base_fee(Some(40_000_000));

        let params = FeeEstimator::default().estimate(&chain).await;
        assert_eq!(params.max_fee_per_gas, Some(60_000_000));
    }

    #[tokio::test]
    async fn missing_base_fee_uses_fallback() {
        let chain = MockChain::new(Address::ZERO);
        chain.set_base_fee(None);

        let params = FeeEstimator::default().estimate(&chain).await;
        assert_eq!(params.max_fee_per_gas, Some(30_000_000));
    }

    #[tokio::test]
    async fn block_read_failure_yields_empty_params() {
        let chain = MockChain::new(Address::ZERO);
        chain.fail_block_reads(true);

        let params = FeeEstimator::default().estimate(&chain).await;
        assert!(params.is_empty());
    }
}
