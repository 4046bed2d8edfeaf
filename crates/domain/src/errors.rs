use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid record data for {record_type}: {reason}")]
    InvalidRecordData { record_type: String, reason: String },

    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("Invalid SOA for zone {zone}: {reason}")]
    InvalidSoa { zone: String, reason: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Backend connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Timed out waiting for a pooled connection after {0} ms")]
    PoolTimeout(u64),

    #[error("Connection pool is closed")]
    PoolClosed,

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Errors raised by the backend transport rather than by the data it returned.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DomainError::ConnectionFailed(_) | DomainError::PoolTimeout(_) | DomainError::PoolClosed
        )
    }
}
