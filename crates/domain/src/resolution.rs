use crate::dns_record::{RecordContent, RecordType};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    NoError,
    NxDomain,
    ServFail,
    NotImp,
    Refused,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::NoError => "NOERROR",
            ResponseStatus::NxDomain => "NXDOMAIN",
            ResponseStatus::ServFail => "SERVFAIL",
            ResponseStatus::NotImp => "NOTIMP",
            ResponseStatus::Refused => "REFUSED",
        }
    }
}

/// A record ready to be written into a response, TTL already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    pub name: Arc<str>,
    pub ttl: u32,
    pub content: RecordContent,
}

impl ResolvedRecord {
    pub fn record_type(&self) -> RecordType {
        self.content.record_type()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub status: ResponseStatus,
    pub authoritative: bool,
    pub answers: Vec<ResolvedRecord>,
    pub authority: Vec<ResolvedRecord>,
    pub additional: Vec<ResolvedRecord>,
}

impl Answer {
    pub fn with_status(status: ResponseStatus) -> Self {
        Self {
            status,
            authoritative: false,
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    pub fn server_failure() -> Self {
        Self::with_status(ResponseStatus::ServFail)
    }

    pub fn not_implemented() -> Self {
        Self::with_status(ResponseStatus::NotImp)
    }

    /// NOERROR with nothing in the answer section.
    pub fn is_nodata(&self) -> bool {
        self.status == ResponseStatus::NoError && self.answers.is_empty()
    }

    pub fn is_referral(&self) -> bool {
        self.status == ResponseStatus::NoError
            && !self.authoritative
            && self.answers.is_empty()
            && self
                .authority
                .iter()
                .any(|r| r.record_type() == RecordType::NS)
    }
}

/// Outcome of resolving one question against the zone store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No known zone encloses the name; the host should try the next handler.
    NotAuthoritative,
    Answer(Answer),
}

impl Resolution {
    pub fn answer(&self) -> Option<&Answer> {
        match self {
            Resolution::Answer(answer) => Some(answer),
            Resolution::NotAuthoritative => None,
        }
    }
}
