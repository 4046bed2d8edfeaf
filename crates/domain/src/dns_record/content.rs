use super::RecordType;
use crate::dns_name::normalize_fqdn;
use crate::DomainError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoaData {
    pub ns: String,
    pub mbox: String,
    #[serde(default)]
    pub serial: Option<u32>,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minttl: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvData {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: Arc<str>,
}

/// Decoded record data; the variant always matches the row's record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordContent {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    CNAME(Arc<str>),
    NS(Arc<str>),
    PTR(Arc<str>),
    MX { preference: u16, host: Arc<str> },
    TXT(String),
    SRV(SrvData),
    SOA(SoaData),
}

#[derive(Deserialize)]
struct IpContent<T> {
    ip: T,
}

#[derive(Deserialize)]
struct HostContent {
    host: String,
}

#[derive(Deserialize)]
struct MxContent {
    host: String,
    preference: u16,
}

#[derive(Deserialize)]
struct TxtContent {
    text: String,
}

#[derive(Deserialize)]
struct SrvContent {
    priority: u16,
    weight: u16,
    port: u16,
    target: String,
}

fn decode<T: DeserializeOwned>(record_type: RecordType, content: &str) -> Result<T, DomainError> {
    serde_json::from_str(content).map_err(|e| DomainError::InvalidRecordData {
        record_type: record_type.to_string(),
        reason: e.to_string(),
    })
}

fn host_name(record_type: RecordType, host: &str) -> Result<Arc<str>, DomainError> {
    if host.trim().is_empty() {
        return Err(DomainError::InvalidRecordData {
            record_type: record_type.to_string(),
            reason: "empty host name".to_string(),
        });
    }
    Ok(Arc::from(normalize_fqdn(host)))
}

impl RecordContent {
    pub fn parse(record_type: RecordType, content: &str) -> Result<Self, DomainError> {
        match record_type {
            RecordType::A => {
                let c: IpContent<Ipv4Addr> = decode(record_type, content)?;
                Ok(RecordContent::A(c.ip))
            }
            RecordType::AAAA => {
                let c: IpContent<Ipv6Addr> = decode(record_type, content)?;
                Ok(RecordContent::AAAA(c.ip))
            }
            RecordType::CNAME => {
                let c: HostContent = decode(record_type, content)?;
                Ok(RecordContent::CNAME(host_name(record_type, &c.host)?))
            }
            RecordType::NS => {
                let c: HostContent = decode(record_type, content)?;
                Ok(RecordContent::NS(host_name(record_type, &c.host)?))
            }
            RecordType::PTR => {
                let c: HostContent = decode(record_type, content)?;
                Ok(RecordContent::PTR(host_name(record_type, &c.host)?))
            }
            RecordType::MX => {
                let c: MxContent = decode(record_type, content)?;
                Ok(RecordContent::MX {
                    preference: c.preference,
                    host: host_name(record_type, &c.host)?,
                })
            }
            RecordType::TXT => {
                let c: TxtContent = decode(record_type, content)?;
                Ok(RecordContent::TXT(c.text))
            }
            RecordType::SRV => {
                let c: SrvContent = decode(record_type, content)?;
                Ok(RecordContent::SRV(SrvData {
                    priority: c.priority,
                    weight: c.weight,
                    port: c.port,
                    target: host_name(record_type, &c.target)?,
                }))
            }
            RecordType::SOA => {
                let mut soa: SoaData = decode(record_type, content)?;
                if soa.ns.trim().is_empty() || soa.mbox.trim().is_empty() {
                    return Err(DomainError::InvalidRecordData {
                        record_type: record_type.to_string(),
                        reason: "ns and mbox are required".to_string(),
                    });
                }
                soa.ns = normalize_fqdn(&soa.ns);
                soa.mbox = normalize_fqdn(&soa.mbox);
                Ok(RecordContent::SOA(soa))
            }
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            RecordContent::A(_) => RecordType::A,
            RecordContent::AAAA(_) => RecordType::AAAA,
            RecordContent::CNAME(_) => RecordType::CNAME,
            RecordContent::NS(_) => RecordType::NS,
            RecordContent::PTR(_) => RecordType::PTR,
            RecordContent::MX { .. } => RecordType::MX,
            RecordContent::TXT(_) => RecordType::TXT,
            RecordContent::SRV(_) => RecordType::SRV,
            RecordContent::SOA(_) => RecordType::SOA,
        }
    }

    /// Target name for CNAME records.
    pub fn cname_target(&self) -> Option<&Arc<str>> {
        match self {
            RecordContent::CNAME(target) => Some(target),
            _ => None,
        }
    }

    /// Name that may need glue when this record is a delegation NS.
    pub fn ns_host(&self) -> Option<&Arc<str>> {
        match self {
            RecordContent::NS(host) => Some(host),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_a() {
        let c = RecordContent::parse(RecordType::A, r#"{"ip": "203.0.113.10"}"#).unwrap();
        assert_eq!(c, RecordContent::A(Ipv4Addr::new(203, 0, 113, 10)));
    }

    #[test]
    fn test_parse_a_rejects_ipv6() {
        assert!(RecordContent::parse(RecordType::A, r#"{"ip": "2001:db8::1"}"#).is_err());
    }

    #[test]
    fn test_parse_cname_normalizes_target() {
        let c = RecordContent::parse(RecordType::CNAME, r#"{"host": "WWW.example.com"}"#).unwrap();
        assert_eq!(c.cname_target().map(|t| t.as_ref()), Some("www.example.com."));
    }

    #[test]
    fn test_parse_soa_serial_optional() {
        let c = RecordContent::parse(
            RecordType::SOA,
            r#"{"ns":"ns1.example.com","mbox":"hostmaster.example.com","refresh":3600,"retry":600,"expire":86400,"minttl":300}"#,
        )
        .unwrap();
        match c {
            RecordContent::SOA(soa) => {
                assert_eq!(soa.serial, None);
                assert_eq!(soa.ns, "ns1.example.com.");
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_parse_srv_and_mx() {
        let srv = RecordContent::parse(
            RecordType::SRV,
            r#"{"priority":10,"weight":5,"port":5060,"target":"sip.example.com."}"#,
        )
        .unwrap();
        assert_eq!(srv.record_type(), RecordType::SRV);

        let mx = RecordContent::parse(RecordType::MX, r#"{"host":"mail.example.com","preference":10}"#)
            .unwrap();
        assert!(matches!(mx, RecordContent::MX { preference: 10, .. }));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(RecordContent::parse(RecordType::TXT, "not json").is_err());
        assert!(RecordContent::parse(RecordType::NS, r#"{"host": ""}"#).is_err());
    }
}
