//! rqlite DNS Domain Layer
pub mod config;
pub mod dns_name;
pub mod dns_record;
pub mod errors;
pub mod question;
pub mod resolution;
pub mod zone;
pub mod zone_snapshot;

pub use config::{CliOverrides, Config, ConfigError, ResolverConfig};
pub use dns_record::{RecordContent, RecordType, SoaData, SrvData, StoredRecord};
pub use errors::DomainError;
pub use question::{QueryClass, QueryType, Question};
pub use resolution::{Answer, Resolution, ResolvedRecord, ResponseStatus};
pub use zone::Zone;
pub use zone_snapshot::{SkippedZone, SnapshotBuild, ZoneSnapshot};
