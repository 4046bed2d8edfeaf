pub mod builders;
pub mod dns_server_mock;
pub mod mock_backend;

pub use builders::{query_bytes, record, soa, SqliteFixture};
pub use dns_server_mock::MockUpstream;
pub use mock_backend::{MockConnection, MockManager};
