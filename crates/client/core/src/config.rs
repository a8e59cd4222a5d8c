//! Client runtime configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::fees::FeePolicy;
use crate::reconcile::ReconcileConfig;

/// Settings shared by every flow the client runs.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub fees: FeePolicy,
    pub reconcile: ReconcileConfig,
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub const fn new(fees: FeePolicy, reconcile: ReconcileConfig) -> Self {
        Self {
            fees,
            reconcile,
            log_dir: None,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// - `TOZLOW_PRIORITY_FEE_WEI` (default: 1000000)
    /// - `TOZLOW_FALLBACK_BASE_FEE_WEI` (default: 20000000)
    /// - `TOZLOW_RECONCILE_ATTEMPTS` (default: 5)
    /// - `TOZLOW_RECONCILE_INTERVAL_MS` (default: 2000)
    /// - `TOZLOW_LOG_DIR` (default: platform cache dir)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(wei) = read_env::<u128>("TOZLOW_PRIORITY_FEE_WEI") {
            config.fees.priority_fee_wei = wei;
        }

        if let Some(wei) = read_env::<u128>("TOZLOW_FALLBACK_BASE_FEE_WEI") {
            config.fees.fallback_base_fee_wei = wei;
        }

        if let Some(attempts) = read_env::<u32>("TOZLOW_RECONCILE_ATTEMPTS") {
            config.reconcile.attempts = attempts.max(1);
        }

        if let Some(millis) = read_env::<u64>("TOZLOW_RECONCILE_INTERVAL_MS") {
            config.reconcile.interval = Duration::from_millis(millis);
        }

        config.log_dir = env::var("TOZLOW_LOG_DIR").ok().map(PathBuf::from);

        config
    }

    pub fn with_fees(mut self, fees: FeePolicy) -> Self {
        self.fees = fees;
        self
    }

    pub fn with_reconcile(mut self, reconcile: ReconcileConfig) -> Self {
        self.reconcile = reconcile;
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
