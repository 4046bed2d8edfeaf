use crate::dns_name::normalize_fqdn;
use crate::RecordType;
use std::fmt;
use std::sync::Arc;

/// Query type as asked on the wire, which is wider than what can be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    Record(RecordType),
    Any,
    Other(u16),
}

impl QueryType {
    pub fn matches(&self, record_type: RecordType) -> bool {
        match self {
            QueryType::Record(rt) => *rt == record_type,
            QueryType::Any => true,
            QueryType::Other(_) => false,
        }
    }

    /// Whether a CNAME at the owner should be chased for this query type.
    pub fn follows_cname(&self) -> bool {
        !matches!(
            self,
            QueryType::Record(RecordType::CNAME) | QueryType::Any
        )
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::Record(rt) => write!(f, "{}", rt),
            QueryType::Any => f.write_str("ANY"),
            QueryType::Other(code) => write!(f, "TYPE{}", code),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryClass {
    Internet,
    Other(u16),
}

impl QueryClass {
    pub fn from_u16(code: u16) -> Self {
        if code == 1 {
            QueryClass::Internet
        } else {
            QueryClass::Other(code)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: Arc<str>,
    pub query_type: QueryType,
    pub query_class: QueryClass,
}

impl Question {
    pub fn new(name: &str, query_type: QueryType, query_class: QueryClass) -> Self {
        Self {
            name: Arc::from(normalize_fqdn(name)),
            query_type,
            query_class,
        }
    }

    pub fn internet(name: &str, record_type: RecordType) -> Self {
        Self::new(name, QueryType::Record(record_type), QueryClass::Internet)
    }
}
