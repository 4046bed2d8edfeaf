use super::duration::parse_duration;
use super::errors::ConfigError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Read consistency requested from the rqlite leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyLevel {
    None,
    #[default]
    Weak,
    Linearizable,
    Strong,
}

impl ConsistencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsistencyLevel::None => "none",
            ConsistencyLevel::Weak => "weak",
            ConsistencyLevel::Linearizable => "linearizable",
            ConsistencyLevel::Strong => "strong",
        }
    }
}

impl FromStr for ConsistencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(ConsistencyLevel::None),
            "weak" => Ok(ConsistencyLevel::Weak),
            "linearizable" => Ok(ConsistencyLevel::Linearizable),
            "strong" => Ok(ConsistencyLevel::Strong),
            other => Err(format!("unknown consistency level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RqliteDsn {
    pub scheme: String,
    /// `host:port` per seed node, in the order given.
    pub nodes: Vec<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub level: ConsistencyLevel,
    pub cluster_discovery: bool,
    pub timeout: Duration,
}

impl RqliteDsn {
    pub fn node_urls(&self) -> Vec<String> {
        self.nodes
            .iter()
            .map(|node| format!("{}://{}", self.scheme, node))
            .collect()
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some()
    }
}

impl fmt::Display for RqliteDsn {
    // Password is never printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme)?;
        if let Some(user) = &self.username {
            write!(f, "{}:***@", user)?;
        }
        write!(f, "{}?level={}", self.nodes.join(","), self.level.as_str())?;
        if !self.cluster_discovery {
            write!(f, "&disableClusterDiscovery=true")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Rqlite(RqliteDsn),
    Sqlite { url: String },
}

impl DataSource {
    pub fn parse(dsn: &str) -> Result<Self, ConfigError> {
        let dsn = dsn.trim();
        if dsn.is_empty() {
            return Err(ConfigError::Dsn("dsn is empty".to_string()));
        }

        if let Some(path) = dsn.strip_prefix("sqlite:") {
            if path.is_empty() {
                return Err(ConfigError::Dsn("sqlite dsn has no path".to_string()));
            }
            return Ok(DataSource::Sqlite {
                url: dsn.to_string(),
            });
        }

        let (scheme, rest) = dsn
            .split_once("://")
            .ok_or_else(|| ConfigError::Dsn(format!("missing scheme in '{}'", dsn)))?;
        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::Dsn(format!("unsupported scheme '{}'", scheme)));
        }

        let (authority, query) = match rest.split_once('?') {
            Some((a, q)) => (a, Some(q)),
            None => (rest, None),
        };
        let authority = authority.trim_end_matches('/');

        let (credentials, hosts) = match authority.rsplit_once('@') {
            Some((c, h)) => (Some(c), h),
            None => (None, authority),
        };

        let (username, password) = match credentials {
            Some(c) => match c.split_once(':') {
                Some((u, p)) => (Some(u.to_string()), Some(p.to_string())),
                None => (Some(c.to_string()), None),
            },
            None => (None, None),
        };

        let mut nodes = Vec::new();
        for node in hosts.split(',') {
            let node = node.trim();
            if node.is_empty() {
                return Err(ConfigError::Dsn("empty host in node list".to_string()));
            }
            if node.contains('/') {
                return Err(ConfigError::Dsn(format!("unexpected path in host '{}'", node)));
            }
            nodes.push(node.to_string());
        }

        let mut parsed = RqliteDsn {
            scheme,
            nodes,
            username,
            password,
            level: ConsistencyLevel::default(),
            cluster_discovery: true,
            timeout: DEFAULT_HTTP_TIMEOUT,
        };

        if let Some(query) = query {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = pair.split_once('=').unwrap_or((pair, "true"));
                match key {
                    "level" => {
                        parsed.level = value.parse().map_err(ConfigError::Dsn)?;
                    }
                    "disableClusterDiscovery" => {
                        let disabled: bool = value.parse().map_err(|_| {
                            ConfigError::Dsn(format!(
                                "disableClusterDiscovery expects true or false, got '{}'",
                                value
                            ))
                        })?;
                        parsed.cluster_discovery = !disabled;
                    }
                    "timeout" => {
                        parsed.timeout = parse_duration(value).map_err(ConfigError::Dsn)?;
                    }
                    other => {
                        return Err(ConfigError::Dsn(format!("unknown parameter '{}'", other)));
                    }
                }
            }
        }

        Ok(DataSource::Rqlite(parsed))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Rqlite(dsn) => dsn.fmt(f),
            DataSource::Sqlite { url } => f.write_str(url),
        }
    }
}
