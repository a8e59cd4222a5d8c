//! Read-after-write reconciliation.
//!
//! A receipt proves a write was included, but the node serving view calls may
//! still answer from an older block for a moment. After each confirmed write
//! the client re-reads a probe until the new state shows up, a bounded number
//! of times.

use std::future::Future;
use std::time::Duration;

use client_blockchain_core::TransportError;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Number of probe calls, including the first.
    pub attempts: u32,
    /// Sleep between probe calls.
    pub interval: Duration,
}

impl ReconcileConfig {
    pub const fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            interval: Duration::from_millis(2000),
        }
    }
}

/// Outcome of [`Reconciler::wait_until`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciled {
    /// The probe saw the write after `attempts` reads.
    Visible { attempts: u32 },
    /// Gave up; reads may still be stale.
    Stale,
}

impl Reconciled {
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible { .. })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    pub const fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Run `probe` until it returns `true`.
    ///
    /// Probe errors count as "not yet"; running out of attempts returns
    /// [`Reconciled::Stale`] rather than an error.
    pub async fn wait_until<F, Fut>(&self, what: &str, mut probe: F) -> Reconciled
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, TransportError>>,
    {
        let attempts = self.config.attempts.max(1);

        for attempt in 1..=attempts {
            match probe().await {
                Ok(true) => {
                    debug!(what, attempt, "Write visible");
                    return Reconciled::Visible { attempts: attempt };
                }
                Ok(false) => debug!(what, attempt, "Write not visible yet"),
                Err(error) => debug!(what, attempt, %error, "Probe failed"),
            }

            if attempt < attempts {
                tokio::time::sleep(self.config.interval).await;
            }
        }

        warn!(what, attempts, "Reads still stale after reconciliation");
        Reconciled::Stale
    }
}
