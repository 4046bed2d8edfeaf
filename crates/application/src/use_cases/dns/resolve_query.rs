use crate::ports::{RecordStore, ZoneSnapshotPort};
use rqlite_dns_domain::dns_name::{ancestors_within, wildcard_of};
use rqlite_dns_domain::{
    Answer, DomainError, QueryClass, Question, RecordContent, RecordType, Resolution,
    ResolvedRecord, ResponseStatus, StoredRecord, Zone,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

pub const MAX_CNAME_DEPTH: usize = 8;

/// Records found at one owner name, already decoded.
struct NodeRecords {
    owner: Arc<str>,
    records: Vec<ResolvedRecord>,
}

enum Lookup {
    Found(NodeRecords),
    NameMissing,
}

/// Answers one question from the published zone snapshot and the record store.
pub struct ResolveQueryUseCase {
    store: Arc<dyn RecordStore>,
    zones: Arc<dyn ZoneSnapshotPort>,
    default_ttl: u32,
    max_cname_depth: usize,
}

impl ResolveQueryUseCase {
    pub fn new(
        store: Arc<dyn RecordStore>,
        zones: Arc<dyn ZoneSnapshotPort>,
        default_ttl: u32,
    ) -> Self {
        Self {
            store,
            zones,
            default_ttl,
            max_cname_depth: MAX_CNAME_DEPTH,
        }
    }

    pub fn with_max_cname_depth(mut self, depth: usize) -> Self {
        self.max_cname_depth = depth;
        self
    }

    pub async fn execute(&self, question: &Question) -> Result<Resolution, DomainError> {
        if question.query_class != QueryClass::Internet {
            debug!(name = %question.name, class = ?question.query_class, "Unsupported query class");
            return Ok(Resolution::Answer(Answer::not_implemented()));
        }

        let snapshot = self.zones.current();
        let Some(zone) = snapshot.find_zone(&question.name) else {
            debug!(name = %question.name, "No enclosing zone, not authoritative");
            return Ok(Resolution::NotAuthoritative);
        };

        if let Some((cut, ns_rows)) = zone.delegation_for(&question.name) {
            debug!(name = %question.name, cut = %cut, "Name is below a zone cut, referring");
            return self.referral(zone, ns_rows).await.map(Resolution::Answer);
        }

        let mut answer = Answer::with_status(ResponseStatus::NoError);
        answer.authoritative = true;

        let mut current_zone = Arc::clone(zone);
        let mut current_name = Arc::clone(&question.name);
        let mut visited: HashSet<Arc<str>> = HashSet::new();
        visited.insert(Arc::clone(&current_name));
        let mut chain: Vec<ResolvedRecord> = Vec::new();

        loop {
            if !chain.is_empty() && current_zone.delegation_for(&current_name).is_some() {
                // Chain left authoritative data; the client follows the referral itself.
                answer.answers = chain;
                return Ok(Resolution::Answer(answer));
            }

            let node = match self.lookup(&current_zone, &current_name).await? {
                Lookup::Found(node) => node,
                Lookup::NameMissing => {
                    answer.status = ResponseStatus::NxDomain;
                    answer.answers = chain;
                    answer.authority.push(self.negative_soa(&current_zone));
                    return Ok(Resolution::Answer(answer));
                }
            };

            let mut matching: Vec<ResolvedRecord> = node
                .records
                .iter()
                .filter(|r| question.query_type.matches(r.record_type()))
                .cloned()
                .collect();

            if !matching.is_empty() {
                chain.append(&mut matching);
                answer.answers = chain;
                return Ok(Resolution::Answer(answer));
            }

            let cname = if question.query_type.follows_cname() {
                node.records
                    .iter()
                    .find(|r| r.record_type() == RecordType::CNAME)
                    .cloned()
            } else {
                None
            };

            let Some(cname) = cname else {
                debug!(name = %node.owner, qtype = %question.query_type, "NODATA");
                answer.answers = chain;
                answer.authority.push(self.negative_soa(&current_zone));
                return Ok(Resolution::Answer(answer));
            };

            let Some(target) = cname.content.cname_target().cloned() else {
                return Ok(Resolution::Answer(Answer::server_failure()));
            };
            chain.push(cname);

            if chain.len() > self.max_cname_depth {
                warn!(name = %question.name, depth = chain.len(), "CNAME chain exceeds maximum depth");
                return Ok(Resolution::Answer(Answer::server_failure()));
            }
            if !visited.insert(Arc::clone(&target)) {
                warn!(name = %question.name, target = %target, "CNAME loop detected");
                return Ok(Resolution::Answer(Answer::server_failure()));
            }

            match snapshot.find_zone(&target) {
                Some(next_zone) => {
                    current_zone = Arc::clone(next_zone);
                    current_name = target;
                }
                None => {
                    debug!(target = %target, "CNAME target outside known zones, ending chain");
                    answer.answers = chain;
                    return Ok(Resolution::Answer(answer));
                }
            }
        }
    }

    /// Fetches the name, its ancestors up to the apex and their wildcards in
    /// one query, then picks the exact match or the closest encloser's wildcard.
    async fn lookup(&self, zone: &Zone, name: &Arc<str>) -> Result<Lookup, DomainError> {
        let ancestors = ancestors_within(name, &zone.origin);

        let mut names: Vec<Arc<str>> = Vec::with_capacity(1 + ancestors.len() * 2);
        names.push(Arc::clone(name));
        for ancestor in &ancestors {
            names.push(Arc::from(*ancestor));
            names.push(Arc::from(wildcard_of(ancestor)));
        }

        let rows = self.store.fetch_records(&zone.origin, &names).await?;

        let mut by_owner: HashMap<Arc<str>, Vec<StoredRecord>> = HashMap::new();
        for row in rows {
            by_owner.entry(Arc::clone(&row.name)).or_default().push(row);
        }

        if let Some(rows) = by_owner.remove(name) {
            return Ok(Lookup::Found(NodeRecords {
                owner: Arc::clone(name),
                records: self.decode(rows, name),
            }));
        }

        // An ancestor with a wildcard child exists even when it owns no rows itself.
        let closest_encloser = ancestors
            .iter()
            .copied()
            .find(|a| {
                by_owner.contains_key(*a) || by_owner.contains_key(wildcard_of(a).as_str())
            })
            .unwrap_or(&*zone.origin);

        let wildcard = wildcard_of(closest_encloser);
        match by_owner.remove(wildcard.as_str()) {
            Some(rows) => {
                debug!(name = %name, wildcard = %wildcard, "Synthesizing from wildcard");
                Ok(Lookup::Found(NodeRecords {
                    owner: Arc::clone(name),
                    records: self.decode(rows, name),
                }))
            }
            None => Ok(Lookup::NameMissing),
        }
    }

    /// Decodes rows as records owned by `owner`, skipping malformed content.
    fn decode(&self, rows: Vec<StoredRecord>, owner: &Arc<str>) -> Vec<ResolvedRecord> {
        rows.into_iter()
            .filter_map(|row| match RecordContent::parse(row.record_type, &row.content) {
                Ok(content) => Some(ResolvedRecord {
                    name: Arc::clone(owner),
                    ttl: row.ttl_or(self.default_ttl),
                    content,
                }),
                Err(e) => {
                    warn!(name = %row.name, record_type = %row.record_type, error = %e, "Skipping malformed record");
                    None
                }
            })
            .collect()
    }

    async fn referral(&self, zone: &Zone, ns_rows: &[StoredRecord]) -> Result<Answer, DomainError> {
        let mut answer = Answer::with_status(ResponseStatus::NoError);

        for row in ns_rows {
            let owner = Arc::clone(&row.name);
            answer.authority.extend(self.decode(vec![row.clone()], &owner));
        }

        let mut glue_names: Vec<Arc<str>> = Vec::new();
        for host in answer.authority.iter().filter_map(|r| r.content.ns_host()) {
            if zone.contains(host) && !glue_names.contains(host) {
                glue_names.push(Arc::clone(host));
            }
        }

        if !glue_names.is_empty() {
            let rows = self.store.fetch_records(&zone.origin, &glue_names).await?;
            for row in rows.into_iter().filter(|r| r.record_type.is_address()) {
                let owner = Arc::clone(&row.name);
                answer.additional.extend(self.decode(vec![row], &owner));
            }
        }

        Ok(answer)
    }

    fn negative_soa(&self, zone: &Zone) -> ResolvedRecord {
        ResolvedRecord {
            name: Arc::clone(&zone.origin),
            ttl: zone.negative_ttl(self.default_ttl),
            content: RecordContent::SOA(zone.soa_data.clone()),
        }
    }
}
