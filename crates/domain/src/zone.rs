use crate::dns_name::{ancestors_within, is_subdomain_of};
use crate::dns_record::{SoaData, StoredRecord};
use std::collections::HashMap;
use std::sync::Arc;

/// Authority data for one zone as captured by a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub origin: Arc<str>,

    /// The winning SOA row (highest serial when several are stored).
    pub soa: StoredRecord,

    /// Decoded SOA with the serial always populated.
    pub soa_data: SoaData,

    /// NS rows owned by the apex.
    pub nameservers: Vec<StoredRecord>,

    /// NS rows owned by names strictly below the apex, keyed by owner.
    pub delegations: HashMap<Arc<str>, Vec<StoredRecord>>,
}

impl Zone {
    pub fn serial(&self) -> u32 {
        self.soa_data.serial.unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        is_subdomain_of(name, &self.origin)
    }

    /// The shallowest zone cut at or above `name`, if `name` lies inside a
    /// delegated subtree of this zone.
    pub fn delegation_for(&self, name: &str) -> Option<(&Arc<str>, &[StoredRecord])> {
        if self.delegations.is_empty() || !self.contains(name) || name == &*self.origin {
            return None;
        }
        let mut path = ancestors_within(name, &self.origin);
        path.pop();
        path.reverse();
        path.push(name);
        path.into_iter()
            .find_map(|candidate| self.delegations.get_key_value(candidate))
            .map(|(owner, records)| (owner, records.as_slice()))
    }

    /// TTL for the SOA placed in negative answers: min(SOA TTL, SOA minimum).
    pub fn negative_ttl(&self, default_ttl: u32) -> u32 {
        self.soa.ttl_or(default_ttl).min(self.soa_data.minttl)
    }
}
