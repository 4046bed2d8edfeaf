use crate::dns_name::{is_subdomain_of, normalize_fqdn, parent};
use crate::dns_record::{RecordContent, RecordType, SoaData, StoredRecord};
use crate::zone::Zone;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable view of every known zone's SOA/NS data.
///
/// Built off to the side by the refresher and published whole; readers hold
/// an `Arc` to whichever snapshot was current when they started.
#[derive(Debug, Clone)]
pub struct ZoneSnapshot {
    zones: HashMap<Arc<str>, Arc<Zone>>,
    captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedZone {
    pub zone: Arc<str>,
    pub reason: String,
}

/// Result of [`ZoneSnapshot::build`]: the snapshot plus what had to be left out.
#[derive(Debug, Clone)]
pub struct SnapshotBuild {
    pub snapshot: ZoneSnapshot,
    pub skipped_zones: Vec<SkippedZone>,
    pub skipped_records: usize,
}

#[derive(Default)]
struct ZoneRows {
    soa: Vec<StoredRecord>,
    ns: Vec<StoredRecord>,
}

impl ZoneSnapshot {
    pub fn empty() -> Self {
        Self {
            zones: HashMap::new(),
            captured_at: Utc::now(),
        }
    }

    /// Groups SOA/NS rows by zone and keeps every zone with a usable SOA.
    pub fn build(rows: Vec<StoredRecord>, captured_at: DateTime<Utc>) -> SnapshotBuild {
        let mut grouped: HashMap<Arc<str>, ZoneRows> = HashMap::new();
        let mut skipped_records = 0usize;

        for row in rows {
            if !is_subdomain_of(&row.name, &row.zone) {
                skipped_records += 1;
                continue;
            }
            let entry = grouped.entry(row.zone.clone()).or_default();
            match row.record_type {
                RecordType::SOA if row.name == row.zone => entry.soa.push(row),
                RecordType::NS => entry.ns.push(row),
                _ => skipped_records += 1,
            }
        }

        let default_serial = (captured_at.timestamp().max(0) as u64 & 0xFFFF_FFFF) as u32;

        let mut zones = HashMap::with_capacity(grouped.len());
        let mut skipped_zones = Vec::new();

        for (origin, rows) in grouped {
            let mut best: Option<(StoredRecord, SoaData)> = None;
            for soa_row in rows.soa {
                match RecordContent::parse(RecordType::SOA, &soa_row.content) {
                    Ok(RecordContent::SOA(mut soa)) => {
                        soa.serial.get_or_insert(default_serial);
                        let better = best
                            .as_ref()
                            .map_or(true, |(_, current)| soa.serial > current.serial);
                        if better {
                            best = Some((soa_row, soa));
                        }
                    }
                    _ => skipped_records += 1,
                }
            }

            let Some((soa, soa_data)) = best else {
                skipped_zones.push(SkippedZone {
                    zone: origin.clone(),
                    reason: "no valid SOA record".to_string(),
                });
                continue;
            };

            let mut nameservers = Vec::new();
            let mut delegations: HashMap<Arc<str>, Vec<StoredRecord>> = HashMap::new();
            for ns in rows.ns {
                if RecordContent::parse(RecordType::NS, &ns.content).is_err() {
                    skipped_records += 1;
                    continue;
                }
                if ns.name == origin {
                    nameservers.push(ns);
                } else {
                    delegations.entry(ns.name.clone()).or_default().push(ns);
                }
            }

            zones.insert(
                origin.clone(),
                Arc::new(Zone {
                    origin,
                    soa,
                    soa_data,
                    nameservers,
                    delegations,
                }),
            );
        }

        SnapshotBuild {
            snapshot: Self { zones, captured_at },
            skipped_zones,
            skipped_records,
        }
    }

    /// Longest-suffix match of `name` against the known zones.
    pub fn find_zone(&self, name: &str) -> Option<&Arc<Zone>> {
        let fqdn = normalize_fqdn(name);
        let mut current: &str = &fqdn;
        loop {
            if let Some(zone) = self.zones.get(current) {
                return Some(zone);
            }
            current = parent(current)?;
        }
    }

    pub fn get(&self, origin: &str) -> Option<&Arc<Zone>> {
        self.zones.get(origin)
    }

    pub fn zones(&self) -> impl Iterator<Item = &Arc<Zone>> {
        self.zones.values()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

impl Default for ZoneSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
