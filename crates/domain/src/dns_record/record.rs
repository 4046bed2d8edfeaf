use super::RecordType;
use std::sync::Arc;

/// One row of the records table after normalization.
///
/// `zone` and `name` are lowercase FQDNs. `content` is still the raw JSON
/// payload; it is decoded lazily by [`super::RecordContent::parse`] so that a
/// single malformed row never prevents the rest of a result set from loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub zone: Arc<str>,

    pub name: Arc<str>,

    pub record_type: RecordType,

    pub content: Arc<str>,

    pub ttl: Option<u32>,
}

impl StoredRecord {
    pub fn new(
        zone: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        record_type: RecordType,
        content: impl Into<Arc<str>>,
        ttl: Option<u32>,
    ) -> Self {
        Self {
            zone: zone.into(),
            name: name.into(),
            record_type,
            content: content.into(),
            ttl,
        }
    }

    /// Stored TTL when present, otherwise the configured default.
    pub fn ttl_or(&self, default_ttl: u32) -> u32 {
        self.ttl.unwrap_or(default_ttl)
    }

    pub fn is_wildcard(&self) -> bool {
        self.name.starts_with("*.")
    }
}
