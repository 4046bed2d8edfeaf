#![allow(dead_code)]
use rqlite_dns_domain::{RecordType, StoredRecord};

pub const EXAMPLE_SOA: &str = r#"{"ns":"ns1.example.com.","mbox":"hostmaster.example.com.","serial":2024010101,"refresh":3600,"retry":600,"expire":86400,"minttl":300}"#;

pub struct StoredRecordBuilder {
    zone: String,
    name: String,
    record_type: RecordType,
    content: String,
    ttl: Option<u32>,
}

impl StoredRecordBuilder {
    pub fn new() -> Self {
        Self {
            zone: "example.com.".to_string(),
            name: "www.example.com.".to_string(),
            record_type: RecordType::A,
            content: r#"{"ip":"203.0.113.10"}"#.to_string(),
            ttl: None,
        }
    }

    pub fn zone(mut self, zone: &str) -> Self {
        self.zone = zone.to_string();
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn record_type(mut self, record_type: RecordType) -> Self {
        self.record_type = record_type;
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn build(self) -> StoredRecord {
        StoredRecord::new(
            self.zone,
            self.name,
            self.record_type,
            self.content,
            self.ttl,
        )
    }
}

impl Default for StoredRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn soa(zone: &str, serial: u32) -> StoredRecord {
    StoredRecordBuilder::new()
        .zone(zone)
        .name(zone)
        .record_type(RecordType::SOA)
        .content(&format!(
            r#"{{"ns":"ns1.{zone}","mbox":"hostmaster.{zone}","serial":{serial},"refresh":3600,"retry":600,"expire":86400,"minttl":300}}"#
        ))
        .ttl(3600)
        .build()
}

pub fn ns(zone: &str, owner: &str, host: &str) -> StoredRecord {
    StoredRecordBuilder::new()
        .zone(zone)
        .name(owner)
        .record_type(RecordType::NS)
        .content(&format!(r#"{{"host":"{host}"}}"#))
        .build()
}
