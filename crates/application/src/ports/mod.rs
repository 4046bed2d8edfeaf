mod cluster_topology_port;
mod next_handler;
mod record_store;
mod zone_snapshot_port;

pub use cluster_topology_port::{ClusterSyncOutcome, ClusterTopologyPort};
pub use next_handler::NextHandler;
pub use record_store::RecordStore;
pub use zone_snapshot_port::{ZoneRefreshOutcome, ZoneSnapshotPort};
