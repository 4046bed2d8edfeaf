use serde::{Deserialize, Serialize};

/// Where queries go when no known zone encloses the name.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NextConfig {
    /// `host:port` of a resolver to forward to. When unset the query is refused.
    #[serde(default)]
    pub upstream: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for NextConfig {
    fn default() -> Self {
        Self {
            upstream: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    2000
}
