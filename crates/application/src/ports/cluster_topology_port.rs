use async_trait::async_trait;
use rqlite_dns_domain::DomainError;

#[derive(Debug, Default, Clone)]
pub struct ClusterSyncOutcome {
    pub nodes: usize,
    pub changed: bool,
}

/// Discovery of backend cluster members.
#[async_trait]
pub trait ClusterTopologyPort: Send + Sync {
    async fn sync_nodes(&self) -> Result<ClusterSyncOutcome, DomainError>;
}
