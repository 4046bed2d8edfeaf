use super::manager::{BackendConnection, ManageConnection, RecordRow, Statement};
use async_trait::async_trait;
use rqlite_dns_domain::DomainError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;
use tracing::error;

/// Local SQLite file behind the same pool as the rqlite backend.
pub struct SqliteManager {
    options: SqliteConnectOptions,
}

impl SqliteManager {
    pub fn new(url: &str) -> Result<Self, DomainError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DomainError::ConfigError(format!("Invalid sqlite url '{}': {}", url, e)))?
            .create_if_missing(true);
        Ok(Self { options })
    }
}

#[async_trait]
impl ManageConnection for SqliteManager {
    type Connection = SqliteBackend;

    async fn connect(&self) -> Result<Self::Connection, DomainError> {
        let conn = self.options.connect().await.map_err(|e| {
            error!(error = %e, "Failed to open sqlite database");
            DomainError::ConnectionFailed(e.to_string())
        })?;
        Ok(SqliteBackend { conn })
    }
}

pub struct SqliteBackend {
    conn: SqliteConnection,
}

fn map_sqlx_error(e: sqlx::Error) -> DomainError {
    match e {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            DomainError::ConnectionFailed(e.to_string())
        }
        other => DomainError::DatabaseError(other.to_string()),
    }
}

#[async_trait]
impl BackendConnection for SqliteBackend {
    async fn ping(&mut self) -> Result<(), DomainError> {
        self.conn.ping().await.map_err(map_sqlx_error)
    }

    async fn fetch_rows(&mut self, statement: &Statement) -> Result<Vec<RecordRow>, DomainError> {
        let mut query = sqlx::query_as::<_, RecordRow>(&statement.sql);
        for param in &statement.params {
            query = query.bind(param);
        }
        query.fetch_all(&mut self.conn).await.map_err(|e| {
            error!(error = %e, "Failed to query records");
            map_sqlx_error(e)
        })
    }

    async fn execute(&mut self, statement: &Statement) -> Result<(), DomainError> {
        let mut query = sqlx::query(&statement.sql);
        for param in &statement.params {
            query = query.bind(param);
        }
        query.execute(&mut self.conn).await.map_err(|e| {
            error!(error = %e, "Failed to execute statement");
            map_sqlx_error(e)
        })?;
        Ok(())
    }
}
