pub mod handler;
pub mod next;
pub mod record_mapper;
pub mod record_type_map;
pub mod response;
pub mod zone_cache;

pub use handler::{DnsRequestHandler, Protocol};
pub use next::{ForwardHandler, RefuseHandler};
pub use record_mapper::RecordMapper;
pub use record_type_map::RecordTypeMapper;
pub use response::{ResponseBuilder, MAX_UDP_PAYLOAD};
pub use zone_cache::ZoneCache;
