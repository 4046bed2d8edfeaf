use async_trait::async_trait;
use rqlite_dns_domain::{DomainError, StoredRecord};
use std::sync::Arc;

/// Read access to the records table.
///
/// Implementations return rows with lowercase FQDN `zone`/`name` and drop rows
/// whose `record_type` is not one of the supported types.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// One round trip to the backend.
    async fn ping(&self) -> Result<(), DomainError>;

    /// Every SOA and NS row across all zones.
    async fn fetch_zone_metadata(&self) -> Result<Vec<StoredRecord>, DomainError>;

    /// Every row of `zone` owned by one of `names`, in a single query.
    async fn fetch_records(
        &self,
        zone: &str,
        names: &[Arc<str>],
    ) -> Result<Vec<StoredRecord>, DomainError>;
}
