use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Deadline for one query, backend round trips included.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    #[serde(default = "default_tcp_idle_timeout_secs")]
    pub tcp_idle_timeout_secs: u64,

    /// Number of SO_REUSEPORT UDP sockets bound to the listen address.
    #[serde(default = "default_udp_workers")]
    pub udp_workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dns_port: default_dns_port(),
            bind_address: default_bind_address(),
            query_timeout_ms: default_query_timeout_ms(),
            tcp_idle_timeout_secs: default_tcp_idle_timeout_secs(),
            udp_workers: default_udp_workers(),
        }
    }
}

fn default_dns_port() -> u16 {
    53
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_query_timeout_ms() -> u64 {
    2000
}

fn default_tcp_idle_timeout_secs() -> u64 {
    10
}

fn default_udp_workers() -> usize {
    2
}
