#![allow(dead_code)]
use async_trait::async_trait;
use rqlite_dns_application::ports::{
    ClusterSyncOutcome, ClusterTopologyPort, RecordStore, ZoneRefreshOutcome, ZoneSnapshotPort,
};
use rqlite_dns_domain::{DomainError, StoredRecord, ZoneSnapshot};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

pub struct MockZoneSnapshot {
    refresh_calls: AtomicU64,
    should_fail: AtomicBool,
}

impl MockZoneSnapshot {
    pub fn new() -> Self {
        Self {
            refresh_calls: AtomicU64::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    pub fn refresh_calls(&self) -> u64 {
        self.refresh_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ZoneSnapshotPort for MockZoneSnapshot {
    fn current(&self) -> Arc<ZoneSnapshot> {
        Arc::new(ZoneSnapshot::empty())
    }

    async fn refresh(&self) -> Result<ZoneRefreshOutcome, DomainError> {
        self.refresh_calls.fetch_add(1, Ordering::Relaxed);
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(DomainError::DatabaseError("mock refresh failed".to_string()));
        }
        Ok(ZoneRefreshOutcome::default())
    }
}

pub struct MockRecordStore {
    ping_calls: AtomicU64,
    should_fail: AtomicBool,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            ping_calls: AtomicU64::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    pub fn ping_calls(&self) -> u64 {
        self.ping_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn ping(&self) -> Result<(), DomainError> {
        self.ping_calls.fetch_add(1, Ordering::Relaxed);
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(DomainError::ConnectionFailed("mock backend down".to_string()));
        }
        Ok(())
    }

    async fn fetch_zone_metadata(&self) -> Result<Vec<StoredRecord>, DomainError> {
        Ok(Vec::new())
    }

    async fn fetch_records(
        &self,
        _zone: &str,
        _names: &[Arc<str>],
    ) -> Result<Vec<StoredRecord>, DomainError> {
        Ok(Vec::new())
    }
}

pub struct MockClusterTopology {
    sync_calls: AtomicU64,
    should_fail: AtomicBool,
}

impl MockClusterTopology {
    pub fn new() -> Self {
        Self {
            sync_calls: AtomicU64::new(0),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    pub fn sync_calls(&self) -> u64 {
        self.sync_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ClusterTopologyPort for MockClusterTopology {
    async fn sync_nodes(&self) -> Result<ClusterSyncOutcome, DomainError> {
        let calls = self.sync_calls.fetch_add(1, Ordering::Relaxed);
        if self.should_fail.load(Ordering::Relaxed) {
            return Err(DomainError::ConnectionFailed("mock discovery failed".to_string()));
        }
        Ok(ClusterSyncOutcome {
            nodes: 3,
            changed: calls == 0,
        })
    }
}
