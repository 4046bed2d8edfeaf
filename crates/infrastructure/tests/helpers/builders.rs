#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType as HickoryRecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use rqlite_dns_domain::{RecordType, StoredRecord};
use rqlite_dns_infrastructure::database::pool::{ConnectionPool, PoolConfig};
use rqlite_dns_infrastructure::database::sqlite::SqliteManager;
use rqlite_dns_infrastructure::repositories::SqlRecordStore;
use std::str::FromStr;
use std::sync::Arc;
use tempfile::TempDir;

pub const EXAMPLE_SOA: &str = r#"{"ns":"ns1.example.com.","mbox":"hostmaster.example.com.","serial":2024010101,"refresh":3600,"retry":600,"expire":86400,"minttl":300}"#;

pub fn record(
    zone: &str,
    name: &str,
    record_type: RecordType,
    content: &str,
    ttl: Option<u32>,
) -> StoredRecord {
    StoredRecord::new(zone, name, record_type, content, ttl)
}

pub fn soa(zone: &str) -> StoredRecord {
    record(zone, zone, RecordType::SOA, EXAMPLE_SOA, Some(3600))
}

/// A SQLite database in a temporary directory, schema created and seeded.
pub struct SqliteFixture {
    pub store: Arc<SqlRecordStore<SqliteManager>>,
    pub url: String,
    _dir: TempDir,
}

impl SqliteFixture {
    pub async fn with_records(records: &[StoredRecord]) -> Self {
        Self::with_prefix("coredns_", records).await
    }

    pub async fn with_prefix(prefix: &str, records: &[StoredRecord]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("records.db").display());
        let manager = SqliteManager::new(&url).unwrap();
        let pool = ConnectionPool::new(manager, PoolConfig::default());
        let store = Arc::new(SqlRecordStore::new(pool, format!("{}records", prefix)));

        store.create_schema().await.unwrap();
        for r in records {
            store.insert(r).await.unwrap();
        }

        Self {
            store,
            url,
            _dir: dir,
        }
    }
}

pub fn query_message(id: u16, name: &str, qtype: HickoryRecordType) -> Message {
    let mut query = Query::new();
    query.set_name(Name::from_str(name).unwrap());
    query.set_query_type(qtype);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);
    message
}

pub fn encode(message: &Message) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).unwrap();
    buf
}

pub fn query_bytes(id: u16, name: &str, qtype: HickoryRecordType) -> Vec<u8> {
    encode(&query_message(id, name, qtype))
}
