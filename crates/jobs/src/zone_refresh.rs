use rqlite_dns_application::ports::{RecordStore, ZoneSnapshotPort};
use rqlite_dns_domain::config::resolver::DEFAULT_ZONE_UPDATE_INTERVAL;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Periodically rebuilds the zone snapshot from the record store.
pub struct ZoneRefreshJob {
    zones: Arc<dyn ZoneSnapshotPort>,
    store: Arc<dyn RecordStore>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl ZoneRefreshJob {
    pub fn new(zones: Arc<dyn ZoneSnapshotPort>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            zones,
            store,
            interval: DEFAULT_ZONE_UPDATE_INTERVAL,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval.as_secs_f64(),
            "Starting zone refresh job"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The initial load already happened at startup.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("ZoneRefreshJob: shutting down");
                    break;
                }
                _ = interval.tick() => self.run_cycle().await,
            }
        }
    }

    async fn run_cycle(&self) {
        if let Err(e) = self.store.ping().await {
            warn!(error = %e, "Backend health check failed, keeping current zones");
            return;
        }

        match self.zones.refresh().await {
            Ok(outcome) => {
                info!(
                    zones = outcome.zones,
                    skipped_zones = outcome.skipped_zones.len(),
                    skipped_records = outcome.skipped_records,
                    "Zone refresh completed"
                );
            }
            Err(e) => {
                error!(error = %e, "Zone refresh failed");
            }
        }
    }
}
