#![allow(dead_code)]
#![allow(unused_imports)]

use async_trait::async_trait;
use chrono::Utc;
use rqlite_dns_application::ports::{RecordStore, ZoneRefreshOutcome, ZoneSnapshotPort};
use rqlite_dns_domain::{DomainError, RecordType, StoredRecord, ZoneSnapshot};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MockRecordStore {
    records: Arc<RwLock<Vec<StoredRecord>>>,
    should_fail: Arc<RwLock<bool>>,
    fetch_calls: Arc<AtomicU64>,
    last_names: Arc<RwLock<Vec<Arc<str>>>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            should_fail: Arc::new(RwLock::new(false)),
            fetch_calls: Arc::new(AtomicU64::new(0)),
            last_names: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_records(records: Vec<StoredRecord>) -> Self {
        let store = Self::new();
        *store.records.try_write().unwrap() = records;
        store
    }

    pub async fn add_record(&self, record: StoredRecord) {
        self.records.write().await.push(record);
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }

    pub fn fetch_calls(&self) -> u64 {
        self.fetch_calls.load(Ordering::Relaxed)
    }

    pub async fn last_names(&self) -> Vec<Arc<str>> {
        self.last_names.read().await.clone()
    }

    async fn check_fail(&self) -> Result<(), DomainError> {
        if *self.should_fail.read().await {
            return Err(DomainError::ConnectionFailed("mock backend down".to_string()));
        }
        Ok(())
    }
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn ping(&self) -> Result<(), DomainError> {
        self.check_fail().await
    }

    async fn fetch_zone_metadata(&self) -> Result<Vec<StoredRecord>, DomainError> {
        self.check_fail().await?;
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| matches!(r.record_type, RecordType::SOA | RecordType::NS))
            .cloned()
            .collect())
    }

    async fn fetch_records(
        &self,
        zone: &str,
        names: &[Arc<str>],
    ) -> Result<Vec<StoredRecord>, DomainError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        *self.last_names.write().await = names.to_vec();
        self.check_fail().await?;
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| &*r.zone == zone && names.iter().any(|n| *n == r.name))
            .cloned()
            .collect())
    }
}

/// Snapshot holder that builds its snapshot from a [`MockRecordStore`].
pub struct MockZoneSnapshot {
    store: MockRecordStore,
    current: std::sync::RwLock<Arc<ZoneSnapshot>>,
}

impl MockZoneSnapshot {
    pub async fn load(store: MockRecordStore) -> Self {
        let rows = store.fetch_zone_metadata().await.unwrap();
        let snapshot = ZoneSnapshot::build(rows, Utc::now()).snapshot;
        Self {
            store,
            current: std::sync::RwLock::new(Arc::new(snapshot)),
        }
    }
}

#[async_trait]
impl ZoneSnapshotPort for MockZoneSnapshot {
    fn current(&self) -> Arc<ZoneSnapshot> {
        Arc::clone(&self.current.read().unwrap())
    }

    async fn refresh(&self) -> Result<ZoneRefreshOutcome, DomainError> {
        let rows = self.store.fetch_zone_metadata().await?;
        let build = ZoneSnapshot::build(rows, Utc::now());
        let outcome = ZoneRefreshOutcome {
            zones: build.snapshot.len(),
            skipped_zones: build.skipped_zones,
            skipped_records: build.skipped_records,
        };
        *self.current.write().unwrap() = Arc::new(build.snapshot);
        Ok(outcome)
    }
}

pub fn record(zone: &str, name: &str, record_type: RecordType, content: &str, ttl: Option<u32>) -> StoredRecord {
    StoredRecord::new(zone, name, record_type, content, ttl)
}

pub fn soa(zone: &str) -> StoredRecord {
    record(
        zone,
        zone,
        RecordType::SOA,
        &format!(
            r#"{{"ns":"ns1.{zone}","mbox":"hostmaster.{zone}","serial":2024010101,"refresh":3600,"retry":600,"expire":86400,"minttl":300}}"#
        ),
        Some(3600),
    )
}
