use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::application::ports::JobStore;

/// Periodically drops finished jobs older than the retention window so
/// the store never grows without bound.
pub struct RetentionSweeper {
    store: Arc<dyn JobStore>,
    interval: Duration,
    retention: chrono::Duration,
}

impl RetentionSweeper {
    pub fn new(store: Arc<dyn JobStore>, interval: Duration, retention: chrono::Duration) -> Self {
        Self {
            store,
            interval,
            retention,
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let cutoff = Utc::now() - self.retention;
            match self.store.sweep_finished_before(cutoff).await {
                Ok(0) => {}
                Ok(swept) => {
                    tracing::info!(swept, "Retired expired jobs");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Job retention sweep failed");
                }
            }
        }
    }
}
