pub mod content;
pub mod record;
pub mod record_type;

pub use content::{RecordContent, SoaData, SrvData};
pub use record::StoredRecord;
pub use record_type::RecordType;
