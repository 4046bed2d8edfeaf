pub mod record_repository;

pub use record_repository::{records_query, schema_statements, SqlRecordStore};
