use hickory_proto::rr::rdata::{self, CNAME, MX, NS, PTR, SOA, SRV, TXT};
use hickory_proto::rr::{Name, RData, Record};
use rqlite_dns_domain::{DomainError, RecordContent, ResolvedRecord, SoaData};
use std::str::FromStr;

/// Character strings on the wire are at most 255 bytes.
const TXT_CHUNK_LEN: usize = 255;

/// Converts resolved records into `hickory_proto` records.
pub struct RecordMapper;

impl RecordMapper {
    pub fn to_hickory(record: &ResolvedRecord) -> Result<Record, DomainError> {
        let owner = Self::name(&record.name)?;
        let rdata = Self::rdata(&record.content)?;
        Ok(Record::from_rdata(owner, record.ttl, rdata))
    }

    pub fn to_hickory_all(records: &[ResolvedRecord]) -> Result<Vec<Record>, DomainError> {
        records.iter().map(Self::to_hickory).collect()
    }

    fn rdata(content: &RecordContent) -> Result<RData, DomainError> {
        let rdata = match content {
            RecordContent::A(ip) => RData::A(rdata::A(*ip)),
            RecordContent::AAAA(ip) => RData::AAAA(rdata::AAAA(*ip)),
            RecordContent::CNAME(target) => RData::CNAME(CNAME(Self::name(target)?)),
            RecordContent::NS(host) => RData::NS(NS(Self::name(host)?)),
            RecordContent::PTR(host) => RData::PTR(PTR(Self::name(host)?)),
            RecordContent::MX { preference, host } => {
                RData::MX(MX::new(*preference, Self::name(host)?))
            }
            RecordContent::TXT(text) => RData::TXT(TXT::new(split_txt(text))),
            RecordContent::SRV(srv) => RData::SRV(SRV::new(
                srv.priority,
                srv.weight,
                srv.port,
                Self::name(&srv.target)?,
            )),
            RecordContent::SOA(soa) => RData::SOA(Self::soa(soa)?),
        };
        Ok(rdata)
    }

    fn soa(soa: &SoaData) -> Result<SOA, DomainError> {
        Ok(SOA::new(
            Self::name(&soa.ns)?,
            Self::name(&soa.mbox)?,
            soa.serial.unwrap_or(0),
            clamp_i32(soa.refresh),
            clamp_i32(soa.retry),
            clamp_i32(soa.expire),
            soa.minttl,
        ))
    }

    fn name(name: &str) -> Result<Name, DomainError> {
        Name::from_str(name)
            .map_err(|e| DomainError::InvalidDomainName(format!("Invalid name '{}': {}", name, e)))
    }
}

fn clamp_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Splits text into 255-byte character strings without cutting a UTF-8 sequence.
fn split_txt(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }

    let mut chunks = Vec::with_capacity(text.len() / TXT_CHUNK_LEN + 1);
    let mut rest = text;
    while !rest.is_empty() {
        let mut end = rest.len().min(TXT_CHUNK_LEN);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (chunk, tail) = rest.split_at(end);
        chunks.push(chunk.to_string());
        rest = tail;
    }
    chunks
}
