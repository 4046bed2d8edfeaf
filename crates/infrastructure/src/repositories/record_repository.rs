use crate::database::manager::{BackendConnection, ManageConnection, RecordRow, Statement};
use crate::database::pool::{ConnectionPool, PoolStatus};
use async_trait::async_trait;
use rqlite_dns_application::ports::RecordStore;
use rqlite_dns_domain::dns_name::normalize_fqdn;
use rqlite_dns_domain::{DomainError, RecordType, StoredRecord};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// DDL for the records table and its lookup index.
pub fn schema_statements(table: &str) -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS {table} (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    zone        TEXT NOT NULL COLLATE NOCASE,
    name        TEXT NOT NULL COLLATE NOCASE,
    record_type TEXT NOT NULL,
    content     TEXT NOT NULL,
    ttl         INTEGER
)"
        ),
        format!("CREATE INDEX IF NOT EXISTS {table}_zone_name ON {table} (zone, name)"),
    ]
}

/// Lookup of `name_count` owner names within one zone.
///
/// Compares the bare columns so the `(zone, name)` index is used; case folding
/// comes from the columns' `NOCASE` collation.
pub fn records_query(table: &str, name_count: usize) -> String {
    let placeholders = vec!["?"; name_count].join(", ");
    format!(
        "SELECT zone, name, record_type, content, ttl FROM {table} \
         WHERE zone = ? AND name IN ({placeholders})"
    )
}

/// [`RecordStore`] over any pooled SQL backend speaking the SQLite dialect.
pub struct SqlRecordStore<M: ManageConnection> {
    pool: ConnectionPool<M>,
    table: String,
}

impl<M: ManageConnection> SqlRecordStore<M> {
    /// `table` must already be validated as a plain identifier.
    pub fn new(pool: ConnectionPool<M>, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    pub fn pool(&self) -> &ConnectionPool<M> {
        &self.pool
    }

    pub fn pool_status(&self) -> PoolStatus {
        self.pool.status()
    }

    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn create_schema(&self) -> Result<(), DomainError> {
        let mut conn = self.pool.get().await?;
        for ddl in schema_statements(&self.table) {
            if let Err(e) = conn.execute(&Statement::new(ddl)).await {
                if e.is_transport() {
                    conn.mark_broken();
                }
                error!(error = %e, "Failed to create records schema");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Inserts one row; used to seed local databases.
    pub async fn insert(&self, record: &StoredRecord) -> Result<(), DomainError> {
        let mut statement = Statement::new(format!(
            "INSERT INTO {} (zone, name, record_type, content, ttl) VALUES (?, ?, ?, ?, {})",
            self.table,
            match record.ttl {
                Some(ttl) => ttl.to_string(),
                None => "NULL".to_string(),
            }
        ));
        statement = statement
            .bind(&*record.zone)
            .bind(&*record.name)
            .bind(record.record_type.as_str())
            .bind(&*record.content);

        let mut conn = self.pool.get().await?;
        let result = conn.execute(&statement).await;
        if let Err(e) = &result {
            if e.is_transport() {
                conn.mark_broken();
            }
        }
        result
    }

    async fn fetch(&self, statement: Statement) -> Result<Vec<StoredRecord>, DomainError> {
        let mut conn = self.pool.get().await?;
        let rows = match conn.fetch_rows(&statement).await {
            Ok(rows) => rows,
            Err(e) => {
                if e.is_transport() {
                    conn.mark_broken();
                }
                error!(error = %e, "Failed to fetch records");
                return Err(e);
            }
        };
        drop(conn);

        Ok(rows.into_iter().filter_map(Self::row_to_record).collect())
    }

    fn row_to_record(row: RecordRow) -> Option<StoredRecord> {
        let (zone, name, record_type, content, ttl) = row;

        let record_type = match record_type.parse::<RecordType>() {
            Ok(rt) => rt,
            Err(_) => {
                debug!(name = %name, record_type = %record_type, "Ignoring unsupported record type");
                return None;
            }
        };

        let ttl = match ttl {
            None => None,
            Some(value) => match u32::try_from(value) {
                Ok(ttl) => Some(ttl),
                Err(_) => {
                    warn!(name = %name, ttl = value, "TTL out of range, using default");
                    None
                }
            },
        };

        Some(StoredRecord::new(
            normalize_fqdn(&zone),
            normalize_fqdn(&name),
            record_type,
            content,
            ttl,
        ))
    }
}

#[async_trait]
impl<M: ManageConnection> RecordStore for SqlRecordStore<M> {
    #[instrument(skip(self))]
    async fn ping(&self) -> Result<(), DomainError> {
        self.pool.health_check().await
    }

    #[instrument(skip(self))]
    async fn fetch_zone_metadata(&self) -> Result<Vec<StoredRecord>, DomainError> {
        let statement = Statement::new(format!(
            "SELECT zone, name, record_type, content, ttl FROM {} \
             WHERE upper(record_type) IN ('SOA', 'NS')",
            self.table
        ));
        self.fetch(statement).await
    }

    #[instrument(skip(self, names), fields(names = names.len()))]
    async fn fetch_records(
        &self,
        zone: &str,
        names: &[Arc<str>],
    ) -> Result<Vec<StoredRecord>, DomainError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut statement = Statement::new(records_query(&self.table, names.len()))
            .bind(zone.to_ascii_lowercase());
        for name in names {
            statement = statement.bind(name.to_ascii_lowercase());
        }

        self.fetch(statement).await
    }
}
