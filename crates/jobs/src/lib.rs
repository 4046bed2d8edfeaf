pub mod cluster_sync;
pub mod runner;
pub mod zone_refresh;

pub use cluster_sync::ClusterSyncJob;
pub use runner::JobRunner;
pub use zone_refresh::ZoneRefreshJob;
