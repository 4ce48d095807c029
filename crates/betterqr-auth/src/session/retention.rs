//! Background purge of revoked sessions past their retention window.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use betterqr_core::config::session::SessionConfig;
use betterqr_core::logging::DB;
use betterqr_core::result::AppResult;

use super::lifetime;
use super::store::SessionStore;

/// Periodically removes revoked sessions older than the retention window.
///
/// Entries may outlive the boundary by up to one sweep interval.
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    store: Arc<dyn SessionStore>,
    retention: Duration,
    interval: StdDuration,
}

impl RetentionSweeper {
    /// Creates a sweeper from the session configuration.
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self {
            store,
            retention: lifetime(config.revoked_retention_seconds),
            interval: StdDuration::from_secs(config.sweep_interval_seconds),
        }
    }

    /// Runs one sweep as of `now`. Returns the number of records changed.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let cutoff = now - self.retention;
        let changed = self.store.purge_revoked_before(cutoff).await?;
        if changed > 0 {
            info!(target: DB, changed, %cutoff, "Purged expired revoked sessions");
        } else {
            debug!(target: DB, %cutoff, "Retention sweep found nothing to purge");
        }
        Ok(changed)
    }

    /// Sweeps on every interval tick until `cancel` turns `true`.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            target: DB,
            interval_seconds = self.interval.as_secs(),
            retention_seconds = self.retention.num_seconds(),
            "Retention sweeper started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep_at(Utc::now()).await {
                        error!(target: DB, error = %e, "Retention sweep failed");
                    }
                }
            }
        }

        info!(target: DB, "Retention sweeper stopped");
    }
}
