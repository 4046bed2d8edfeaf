use super::directives::{expand_env, tokenize, DirectiveLine, Token};
use super::dsn::DataSource;
use super::duration::parse_duration;
use super::errors::ConfigError;
use std::time::Duration;

pub const PLUGIN_NAME: &str = "rqlite";
pub const DEFAULT_TABLE_PREFIX: &str = "coredns_";
pub const TABLE_SUFFIX: &str = "records";
/// TTL used when no `{ }` block is given, including a bare `rqlite` line.
pub const BASE_TTL: u32 = 300;
/// TTL used when a block is present but does not set `ttl`.
pub const BLOCK_DEFAULT_TTL: u32 = 360;
pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_OPEN_CONNECTIONS: usize = 10;
pub const DEFAULT_MAX_IDLE_CONNECTIONS: usize = 10;
pub const DEFAULT_ZONE_UPDATE_INTERVAL: Duration = Duration::from_secs(600);

/// Immutable resolver settings, built once at startup and shared by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub dsn: String,
    pub table_prefix: String,
    pub ttl: u32,
    pub max_lifetime: Duration,
    pub max_open_connections: usize,
    pub max_idle_connections: usize,
    pub zone_update_interval: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            table_prefix: DEFAULT_TABLE_PREFIX.to_string(),
            ttl: BASE_TTL,
            max_lifetime: DEFAULT_MAX_LIFETIME,
            max_open_connections: DEFAULT_MAX_OPEN_CONNECTIONS,
            max_idle_connections: DEFAULT_MAX_IDLE_CONNECTIONS,
            zone_update_interval: DEFAULT_ZONE_UPDATE_INTERVAL,
        }
    }
}

impl ResolverConfig {
    pub fn table_name(&self) -> String {
        format!("{}{}", self.table_prefix, TABLE_SUFFIX)
    }

    pub fn data_source(&self) -> Result<DataSource, ConfigError> {
        DataSource::parse(&self.dsn)
    }

    pub fn with_dsn(mut self, dsn: impl Into<String>) -> Self {
        self.dsn = expand_env(&dsn.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_prefix.is_empty()
            || !self
                .table_prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "table_prefix '{}' may only contain letters, digits and '_'",
                self.table_prefix
            )));
        }
        if self.zone_update_interval.is_zero() {
            return Err(ConfigError::Validation(
                "zone_update_interval must be greater than zero".to_string(),
            ));
        }
        self.data_source()?;
        Ok(())
    }

    /// Parses a directive block. Empty input (no block) yields the base defaults.
    pub fn from_directives(input: &str) -> Result<Self, ConfigError> {
        let lines = tokenize(input)?;
        let mut config = ResolverConfig::default();

        let Some((header, body)) = lines.split_first() else {
            return Ok(config);
        };

        let block_open = match header.tokens.as_slice() {
            [Token::Word(name)] if name == PLUGIN_NAME => false,
            [Token::Word(name), Token::OpenBlock] if name == PLUGIN_NAME => true,
            [Token::Word(name), ..] if name == PLUGIN_NAME => {
                return Err(ConfigError::Directive {
                    line: header.line,
                    message: format!("unexpected arguments after '{}'", PLUGIN_NAME),
                });
            }
            _ => {
                return Err(ConfigError::Directive {
                    line: header.line,
                    message: format!("expected '{}' block", PLUGIN_NAME),
                });
            }
        };

        if !block_open {
            if let Some(extra) = body.first() {
                return Err(ConfigError::Directive {
                    line: extra.line,
                    message: "unexpected content after directive".to_string(),
                });
            }
            return Ok(config);
        }

        config.ttl = BLOCK_DEFAULT_TTL;
        let mut closed = false;
        for line in body {
            if closed {
                return Err(ConfigError::Directive {
                    line: line.line,
                    message: "unexpected content after closing '}'".to_string(),
                });
            }
            if line.tokens == [Token::CloseBlock] {
                closed = true;
                continue;
            }
            config.apply(line)?;
        }

        if !closed {
            return Err(ConfigError::Directive {
                line: lines.last().map(|l| l.line).unwrap_or(1),
                message: "missing closing '}'".to_string(),
            });
        }

        Ok(config)
    }

    fn apply(&mut self, line: &DirectiveLine) -> Result<(), ConfigError> {
        let err = |message: String| ConfigError::Directive {
            line: line.line,
            message,
        };

        let mut words = Vec::with_capacity(line.tokens.len());
        for token in &line.tokens {
            match token {
                Token::Word(w) => words.push(w.as_str()),
                Token::OpenBlock | Token::CloseBlock => {
                    return Err(err("unexpected brace inside block".to_string()));
                }
            }
        }

        let (key, args) = match words.split_first() {
            Some(split) => split,
            None => return Ok(()),
        };
        let key = *key;

        const KNOWN: [&str; 7] = [
            "dsn",
            "table_prefix",
            "max_lifetime",
            "max_open_connections",
            "max_idle_connections",
            "zone_update_interval",
            "ttl",
        ];
        if !KNOWN.contains(&key) {
            return Err(err(format!("unknown property '{}'", key)));
        }

        let value = match args {
            [value] => *value,
            [] | [_, _, ..] => {
                return Err(err(format!(
                    "wrong argument count or unexpected line ending after '{}'",
                    key
                )));
            }
        };

        match key {
            "dsn" => self.dsn = expand_env(value),
            "table_prefix" => self.table_prefix = value.to_string(),
            "max_lifetime" => {
                self.max_lifetime = parse_duration(value).map_err(err)?;
            }
            "max_open_connections" => {
                self.max_open_connections = parse_number(key, value).map_err(err)?;
            }
            "max_idle_connections" => {
                self.max_idle_connections = parse_number(key, value).map_err(err)?;
            }
            "zone_update_interval" => {
                self.zone_update_interval = parse_duration(value).map_err(err)?;
            }
            "ttl" => self.ttl = parse_number(key, value).map_err(err)?,
            _ => return Err(err(format!("unknown property '{}'", key))),
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("invalid number '{}' for '{}'", value, key))
}
