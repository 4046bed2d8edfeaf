use arc_swap::ArcSwap;
use async_trait::async_trait;
use chrono::Utc;
use rqlite_dns_application::ports::{RecordStore, ZoneRefreshOutcome, ZoneSnapshotPort};
use rqlite_dns_domain::{DomainError, SnapshotBuild, ZoneSnapshot};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Publishes the current [`ZoneSnapshot`] behind an `ArcSwap`.
///
/// Readers never block; a refresh builds the next snapshot without holding
/// anything and swaps it in whole.
pub struct ZoneCache {
    store: Arc<dyn RecordStore>,
    snapshot: ArcSwap<ZoneSnapshot>,
}

impl ZoneCache {
    /// Performs the initial load. Failure here is fatal to startup.
    pub async fn load(store: Arc<dyn RecordStore>) -> Result<Self, DomainError> {
        info!("Loading zone metadata");
        let build = Self::build(store.as_ref()).await.map_err(|e| {
            error!(error = %e, "Initial zone load failed");
            e
        })?;
        let outcome = Self::report(&build);
        info!(zones = outcome.zones, "Zone metadata loaded");

        Ok(Self {
            store,
            snapshot: ArcSwap::from_pointee(build.snapshot),
        })
    }

    async fn build(store: &dyn RecordStore) -> Result<SnapshotBuild, DomainError> {
        let rows = store.fetch_zone_metadata().await?;
        Ok(ZoneSnapshot::build(rows, Utc::now()))
    }

    fn report(build: &SnapshotBuild) -> ZoneRefreshOutcome {
        for skipped in &build.skipped_zones {
            warn!(zone = %skipped.zone, reason = %skipped.reason, "Skipping zone");
        }
        if build.skipped_records > 0 {
            warn!(records = build.skipped_records, "Skipped malformed SOA/NS rows");
        }
        ZoneRefreshOutcome {
            zones: build.snapshot.len(),
            skipped_zones: build.skipped_zones.clone(),
            skipped_records: build.skipped_records,
        }
    }
}

#[async_trait]
impl ZoneSnapshotPort for ZoneCache {
    fn current(&self) -> Arc<ZoneSnapshot> {
        self.snapshot.load_full()
    }

    async fn refresh(&self) -> Result<ZoneRefreshOutcome, DomainError> {
        let build = Self::build(self.store.as_ref()).await.map_err(|e| {
            error!(error = %e, "Zone refresh failed, keeping previous snapshot");
            e
        })?;
        let outcome = Self::report(&build);
        self.snapshot.store(Arc::new(build.snapshot));
        Ok(outcome)
    }
}
