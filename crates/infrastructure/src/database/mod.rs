pub mod manager;
pub mod pool;
pub mod rqlite;
pub mod sqlite;

use crate::repositories::SqlRecordStore;
use pool::{ConnectionPool, PoolConfig, PoolStatus};
use rqlite::{RqliteCluster, RqliteManager};
use rqlite_dns_application::ports::{ClusterTopologyPort, RecordStore};
use rqlite_dns_domain::config::DataSource;
use rqlite_dns_domain::{DomainError, ResolverConfig};
use sqlite::SqliteManager;
use std::sync::Arc;
use tracing::info;

/// The opened record store, typed by backend.
pub enum Backend {
    Rqlite {
        store: Arc<SqlRecordStore<RqliteManager>>,
        cluster: Arc<RqliteCluster>,
    },
    Sqlite {
        store: Arc<SqlRecordStore<SqliteManager>>,
    },
}

impl Backend {
    /// Builds the pool for the configured data source. No connection is
    /// opened yet; call [`Backend::health_check`] for that.
    pub fn open(config: &ResolverConfig) -> Result<Self, DomainError> {
        let pool_config = PoolConfig::from_resolver(config);
        let table = config.table_name();

        match config.data_source()? {
            DataSource::Rqlite(dsn) => {
                info!(dsn = %dsn, table = %table, "Using rqlite backend");
                let cluster = Arc::new(RqliteCluster::new(dsn)?);
                let pool = ConnectionPool::new(RqliteManager::new(Arc::clone(&cluster)), pool_config);
                Ok(Backend::Rqlite {
                    store: Arc::new(SqlRecordStore::new(pool, table)),
                    cluster,
                })
            }
            DataSource::Sqlite { url } => {
                info!(url = %url, table = %table, "Using sqlite backend");
                let pool = ConnectionPool::new(SqliteManager::new(&url)?, pool_config);
                Ok(Backend::Sqlite {
                    store: Arc::new(SqlRecordStore::new(pool, table)),
                })
            }
        }
    }

    pub fn record_store(&self) -> Arc<dyn RecordStore> {
        match self {
            Backend::Rqlite { store, .. } => Arc::clone(store) as Arc<dyn RecordStore>,
            Backend::Sqlite { store } => Arc::clone(store) as Arc<dyn RecordStore>,
        }
    }

    /// Cluster discovery, when the backend is rqlite and discovery is enabled.
    pub fn cluster_topology(&self) -> Option<Arc<dyn ClusterTopologyPort>> {
        match self {
            Backend::Rqlite { cluster, .. } if cluster.dsn().cluster_discovery => {
                Some(Arc::clone(cluster) as Arc<dyn ClusterTopologyPort>)
            }
            _ => None,
        }
    }

    pub async fn health_check(&self) -> Result<(), DomainError> {
        self.record_store().ping().await
    }

    pub fn status(&self) -> PoolStatus {
        match self {
            Backend::Rqlite { store, .. } => store.pool_status(),
            Backend::Sqlite { store } => store.pool_status(),
        }
    }

    pub fn close(&self) {
        match self {
            Backend::Rqlite { store, .. } => store.pool().close(),
            Backend::Sqlite { store } => store.pool().close(),
        }
    }
}
