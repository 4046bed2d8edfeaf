pub mod directives;
pub mod dsn;
pub mod duration;
pub mod errors;
pub mod logging;
pub mod next;
pub mod resolver;
pub mod root;
pub mod server;

pub use dsn::{ConsistencyLevel, DataSource, RqliteDsn};
pub use duration::parse_duration;
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use next::NextConfig;
pub use resolver::{ResolverConfig, PLUGIN_NAME};
pub use root::{CliOverrides, Config, PluginConfig};
pub use server::ServerConfig;
