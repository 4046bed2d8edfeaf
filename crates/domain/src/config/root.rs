use serde::{Deserialize, Serialize};
use std::path::Path;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::next::NextConfig;
use super::resolver::ResolverConfig;
use super::server::ServerConfig;

const LOCAL_CONFIG: &str = "rqlite-dns.toml";
const SYSTEM_CONFIG: &str = "/etc/rqlite-dns/config.toml";

/// Plugin section: the raw `rqlite { ... }` directive block.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub directives: String,
}

/// Main configuration structure for the rqlite DNS server
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub next: NextConfig,

    #[serde(default)]
    pub plugin: PluginConfig,

    /// DSN given on the command line; replaces the directive's `dsn`.
    #[serde(skip)]
    pub dsn_override: Option<String>,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. rqlite-dns.toml in current directory
    /// 3. /etc/rqlite-dns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new(LOCAL_CONFIG).exists() {
            Self::from_file(LOCAL_CONFIG)?
        } else if Path::new(SYSTEM_CONFIG).exists() {
            Self::from_file(SYSTEM_CONFIG)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(dsn) = overrides.dsn {
            self.dsn_override = Some(dsn);
        }
    }

    /// Parses the plugin directives, with the command-line DSN applied on top.
    pub fn resolver_config(&self) -> Result<ResolverConfig, ConfigError> {
        let resolver = ResolverConfig::from_directives(&self.plugin.directives)?;
        Ok(match &self.dsn_override {
            Some(dsn) => resolver.with_dsn(dsn.as_str()),
            None => resolver,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }
        if self.server.udp_workers == 0 {
            return Err(ConfigError::Validation(
                "udp_workers must be at least 1".to_string(),
            ));
        }
        if self.server.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "query_timeout_ms cannot be 0".to_string(),
            ));
        }
        if let Some(upstream) = &self.next.upstream {
            if upstream.parse::<std::net::SocketAddr>().is_err() {
                return Err(ConfigError::Validation(format!(
                    "next.upstream '{}' is not a valid host:port address",
                    upstream
                )));
            }
        }

        self.resolver_config()?.validate()
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub dsn: Option<String>,
}
