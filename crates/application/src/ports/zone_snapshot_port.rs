use async_trait::async_trait;
use rqlite_dns_domain::{DomainError, SkippedZone, ZoneSnapshot};
use std::sync::Arc;

/// Outcome of a zone metadata refresh.
#[derive(Debug, Default, Clone)]
pub struct ZoneRefreshOutcome {
    pub zones: usize,
    pub skipped_zones: Vec<SkippedZone>,
    pub skipped_records: usize,
}

/// Holder of the currently published [`ZoneSnapshot`].
#[async_trait]
pub trait ZoneSnapshotPort: Send + Sync {
    fn current(&self) -> Arc<ZoneSnapshot>;

    /// Rebuilds the snapshot from the store and publishes it. On error the
    /// previous snapshot stays published.
    async fn refresh(&self) -> Result<ZoneRefreshOutcome, DomainError>;
}
