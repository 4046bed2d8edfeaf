use async_trait::async_trait;
use rqlite_dns_domain::DomainError;

/// A parameterized SQL statement. Every parameter is bound as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<String>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, value: impl Into<String>) -> Self {
        self.params.push(value.into());
        self
    }
}

/// One raw row of the records table: zone, name, record_type, content, ttl.
pub type RecordRow = (String, String, String, String, Option<i64>);

/// Opens backend connections on behalf of a [`super::pool::ConnectionPool`].
#[async_trait]
pub trait ManageConnection: Send + Sync + 'static {
    type Connection: BackendConnection;

    async fn connect(&self) -> Result<Self::Connection, DomainError>;
}

/// A single live connection to the records backend.
#[async_trait]
pub trait BackendConnection: Send + 'static {
    async fn ping(&mut self) -> Result<(), DomainError>;

    async fn fetch_rows(&mut self, statement: &Statement) -> Result<Vec<RecordRow>, DomainError>;

    async fn execute(&mut self, statement: &Statement) -> Result<(), DomainError>;
}
