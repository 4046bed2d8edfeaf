use rqlite_dns_application::ports::ClusterTopologyPort;
use rqlite_dns_domain::config::resolver::DEFAULT_ZONE_UPDATE_INTERVAL;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Keeps the backend's node list in step with cluster membership.
pub struct ClusterSyncJob {
    topology: Arc<dyn ClusterTopologyPort>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl ClusterSyncJob {
    pub fn new(topology: Arc<dyn ClusterTopologyPort>) -> Self {
        Self {
            topology,
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
            "Starting cluster sync job"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("ClusterSyncJob: shutting down");
                    break;
                }
                _ = interval.tick() => {
                    match self.topology.sync_nodes().await {
                        Ok(outcome) if outcome.changed => {
                            info!(nodes = outcome.nodes, "Cluster node list updated");
                        }
                        Ok(outcome) => {
                            debug!(nodes = outcome.nodes, "Cluster node list unchanged");
                        }
                        Err(e) => {
                            warn!(error = %e, "Cluster discovery failed, keeping known nodes");
                        }
                    }
                }
            }
        }
    }
}
