//! Sliding window submission ledger.
//!
//! Each client address maps to the timestamps of its accepted submissions
//! inside the trailing window. Stale timestamps are pruned on every lookup.
//! The ledger lives in memory only: a restart or a second instance starts
//! from zero.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use arc_swap::ArcSwap;
use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::config::{ContactConfig, RateLimitConfig};
use crate::observability::metrics;

/// Per-address submission timestamps in epoch milliseconds.
#[derive(Debug, Default)]
pub struct RateLimitLedger {
    entries: DashMap<String, VecDeque<u64>>,
}

impl RateLimitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `client` already used up its window.
    ///
    /// Otherwise records `now_ms` and returns false. A rejected request is
    /// not recorded, so it does not extend the block. The entry guard holds
    /// the shard lock for the whole prune/count/append sequence, so two
    /// concurrent requests from one address cannot both take the last slot.
    pub fn is_rate_limited(&self, client: &str, now_ms: u64, policy: &RateLimitConfig) -> bool {
        let mut timestamps = self.entries.entry(client.to_string()).or_default();
        prune(&mut timestamps, now_ms, policy.window_ms());

        if timestamps.len() >= policy.max_submissions {
            return true;
        }

        timestamps.push_back(now_ms);
        false
    }

    /// Number of accepted submissions for `client` still inside the window.
    pub fn recent(&self, client: &str, now_ms: u64, window_ms: u64) -> usize {
        match self.entries.get_mut(client) {
            Some(mut timestamps) => {
                prune(&mut timestamps, now_ms, window_ms);
                timestamps.len()
            }
            None => 0,
        }
    }

    /// Drop addresses with nothing left inside the window.
    ///
    /// Returns the number of addresses removed.
    pub fn sweep(&self, now_ms: u64, window_ms: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, timestamps| {
            prune(timestamps, now_ms, window_ms);
            !timestamps.is_empty()
        });
        before.saturating_sub(self.entries.len())
    }

    /// Number of tracked addresses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn prune(timestamps: &mut VecDeque<u64>, now_ms: u64, window_ms: u64) {
    while let Some(&oldest) = timestamps.front() {
        if now_ms.saturating_sub(oldest) >= window_ms {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}

/// One sweep under the live configuration.
///
/// Returns the number of addresses removed. Nothing is swept while rate
/// limiting is disabled.
pub fn sweep_current(ledger: &RateLimitLedger, config: &ArcSwap<ContactConfig>, now_ms: u64) -> usize {
    let config = config.load();
    if !config.rate_limit.enabled {
        return 0;
    }
    ledger.sweep(now_ms, config.rate_limit.window_ms())
}

/// Periodically sweep idle addresses until shutdown.
///
/// Window, interval and the enabled flag are re-read on every tick, so
/// reloads take effect without a restart.
pub fn spawn_sweeper(
    ledger: Arc<RateLimitLedger>,
    config: Arc<ArcSwap<ContactConfig>>,
    mut shutdown: broadcast::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let every = Duration::from_secs(config.load().rate_limit.sweep_interval_secs.max(1));
            tokio::select! {
                _ = tokio::time::sleep(every) => {
                    let removed = sweep_current(&ledger, &config, crate::now_millis());
                    metrics::record_ledger_size(ledger.len());
                    if removed > 0 {
                        tracing::debug!(removed, tracked = ledger.len(), "Swept idle rate limit entries");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Rate limit sweeper stopped");
                    break;
                }
            }
        }
    })
}
