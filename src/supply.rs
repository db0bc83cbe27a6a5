//! Live view of the contract's total supply.
//!
//! The value is bootstrapped once from `totalSupply()` and then only ever
//! raised by the mint listener, so every request handler reads it without
//! locking or blocking. Updates are monotone (`fetch_max`), which makes
//! duplicate and out-of-order event deliveries no-ops.
//!
//! Known gap: a mint landing between the bootstrap read and the filter
//! installation (or while a dropped filter is being reinstalled) is only
//! observed once a later event carries a higher token ID. The tracked value
//! is best-known and monotonic, not exact at all times.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::chain::ChainClient;
use crate::metrics::METRICS;

/// Delay before re-attempting a failed filter install or drain.
const LISTENER_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Monotonically increasing count of minted tokens.
pub struct SupplyTracker {
    minted: AtomicU64,
}

impl SupplyTracker {
    pub fn new(initial: u64) -> Self {
        Self {
            minted: AtomicU64::new(initial),
        }
    }

    /// Latest known total supply. Non-blocking.
    pub fn current(&self) -> u64 {
        self.minted.load(Ordering::Relaxed)
    }

    /// Raise the tracked supply to an observed mint's token ID. Never
    /// decreases. Returns whether the stored value increased.
    pub fn apply_observed_mint(&self, token_id: u64) -> bool {
        let previous = self.minted.fetch_max(token_id, Ordering::Relaxed);
        token_id > previous
    }

    /// Long-lived mint listener: install a mint filter, drain it on the poll
    /// interval, and reinstall after any chain error. Runs until cancelled.
    pub async fn run_listener(
        &self,
        chain: &ChainClient,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) {
        loop {
            let filter_id = tokio::select! {
                _ = cancel.cancelled() => return,
                result = chain.install_mint_filter() => match result {
                    Ok(id) => {
                        info!(filter = %id, "Mint filter installed");
                        id
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to install mint filter, retrying");
                        tokio::select! {
                            _ = cancel.cancelled() => return,
                            _ = tokio::time::sleep(LISTENER_RETRY_DELAY) => continue,
                        }
                    }
                },
            };

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(poll_interval) => {}
                }

                match chain.drain_mint_filter(&filter_id).await {
                    Ok(token_ids) => {
                        for token_id in token_ids {
                            METRICS.mint_events.fetch_add(1, Ordering::Relaxed);
                            if self.apply_observed_mint(token_id) {
                                info!(token_id, supply = self.current(), "Supply increased");
                            }
                        }
                    }
                    Err(e) => {
                        // Filters expire server-side; reinstall rather than retry.
                        warn!(error = %e, "Mint filter drain failed, reinstalling");
                        tokio::select! {
                            _ = cancel.cancelled() => return,
                            _ = tokio::time::sleep(LISTENER_RETRY_DELAY) => {}
                        }
                        break;
                    }
                }
            }
        }
    }
}
