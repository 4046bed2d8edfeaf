use rqlite_dns_application::ports::{ClusterTopologyPort, RecordStore};
use rqlite_dns_infrastructure::database::Backend;
use std::sync::Arc;

pub struct Repositories {
    pub backend: Backend,
    pub records: Arc<dyn RecordStore>,
    pub cluster: Option<Arc<dyn ClusterTopologyPort>>,
}

impl Repositories {
    pub fn new(backend: Backend) -> Self {
        let records = backend.record_store();
        let cluster = backend.cluster_topology();
        Self {
            backend,
            records,
            cluster,
        }
    }
}
