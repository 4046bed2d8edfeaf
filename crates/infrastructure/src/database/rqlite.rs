//! rqlite HTTP API client.
//!
//! A "connection" is bound to one cluster node. Reads go through
//! `POST /db/query?level=<level>`, writes through `POST /db/execute`, and the
//! ping is `GET /status`. Statements are sent in rqlite's parameterized form:
//! `[["SELECT ... WHERE a = ?", "value"]]`.

use super::manager::{BackendConnection, ManageConnection, RecordRow, Statement};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rqlite_dns_application::ports::{ClusterSyncOutcome, ClusterTopologyPort};
use rqlite_dns_domain::config::RqliteDsn;
use rqlite_dns_domain::DomainError;
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

const RECORD_COLUMNS: [&str; 5] = ["zone", "name", "record_type", "content", "ttl"];

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<QueryResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
    #[serde(default)]
    error: Option<String>,
}

/// Shared state of one rqlite cluster: HTTP client, credentials and the
/// current node list.
pub struct RqliteCluster {
    dsn: RqliteDsn,
    client: reqwest::Client,
    auth_header: Option<String>,
    nodes: ArcSwap<Vec<String>>,
    cursor: AtomicUsize,
}

impl RqliteCluster {
    pub fn new(dsn: RqliteDsn) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(dsn.timeout)
            .build()
            .map_err(|e| DomainError::ConnectionFailed(format!("Failed to build HTTP client: {}", e)))?;

        let auth_header = dsn.username.as_ref().map(|user| {
            let credentials = format!("{}:{}", user, dsn.password.as_deref().unwrap_or_default());
            format!("Basic {}", STANDARD.encode(credentials))
        });

        let nodes = dsn.node_urls();
        Ok(Self {
            dsn,
            client,
            auth_header,
            nodes: ArcSwap::from_pointee(nodes),
            cursor: AtomicUsize::new(fastrand::usize(..)),
        })
    }

    pub fn dsn(&self) -> &RqliteDsn {
        &self.dsn
    }

    pub fn nodes(&self) -> Arc<Vec<String>> {
        self.nodes.load_full()
    }

    /// Node URLs in connection order, starting at the next node in rotation.
    fn rotation(&self) -> Vec<String> {
        let nodes = self.nodes.load();
        if nodes.is_empty() {
            return Vec::new();
        }
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % nodes.len();
        nodes
            .iter()
            .cycle()
            .skip(start)
            .take(nodes.len())
            .cloned()
            .collect()
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.auth_header {
            Some(header) => builder.header(reqwest::header::AUTHORIZATION, header),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder, node: &str) -> Result<Vec<u8>, DomainError> {
        let response = builder.send().await.map_err(|e| {
            DomainError::ConnectionFailed(format!("rqlite node {} unreachable: {}", node, e))
        })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(DomainError::ConnectionFailed(format!(
                "rqlite node {} returned HTTP {}",
                node,
                status.as_u16()
            )));
        }
        if !status.is_success() {
            return Err(DomainError::DatabaseError(format!(
                "rqlite node {} returned HTTP {}",
                node,
                status.as_u16()
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            DomainError::ConnectionFailed(format!("Failed to read response from {}: {}", node, e))
        })?;
        Ok(body.to_vec())
    }

    async fn probe(&self, node: &str) -> Result<(), DomainError> {
        let builder = self.request(reqwest::Method::GET, format!("{}/status", node));
        self.send(builder, node).await.map(|_| ())
    }

    async fn post_statement(
        &self,
        node: &str,
        url: String,
        statement: &Statement,
    ) -> Result<Vec<u8>, DomainError> {
        let builder = self
            .request(reqwest::Method::POST, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(statement_body(statement)?);
        self.send(builder, node).await
    }
}

fn statement_body(statement: &Statement) -> Result<Vec<u8>, DomainError> {
    let mut entry: Vec<Value> = Vec::with_capacity(statement.params.len() + 1);
    entry.push(Value::String(statement.sql.clone()));
    entry.extend(statement.params.iter().cloned().map(Value::String));
    serde_json::to_vec(&vec![entry])
        .map_err(|e| DomainError::DatabaseError(format!("Failed to encode statement: {}", e)))
}

fn decode_response(bytes: &[u8]) -> Result<QueryResponse, DomainError> {
    let response: QueryResponse = serde_json::from_slice(bytes)
        .map_err(|e| DomainError::DatabaseError(format!("Malformed rqlite response: {}", e)))?;
    if let Some(error) = &response.error {
        return Err(DomainError::DatabaseError(error.clone()));
    }
    if let Some(error) = response.results.iter().find_map(|r| r.error.as_ref()) {
        return Err(DomainError::DatabaseError(error.clone()));
    }
    Ok(response)
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Maps an rqlite query body onto record rows by column name.
pub fn parse_record_rows(bytes: &[u8]) -> Result<Vec<RecordRow>, DomainError> {
    let response = decode_response(bytes)?;
    let Some(result) = response.results.into_iter().next() else {
        return Ok(Vec::new());
    };
    if result.values.is_empty() {
        return Ok(Vec::new());
    }

    let mut index = [0usize; 5];
    for (slot, column) in index.iter_mut().zip(RECORD_COLUMNS) {
        *slot = result
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .ok_or_else(|| {
                DomainError::DatabaseError(format!("rqlite result is missing column '{}'", column))
            })?;
    }

    let mut rows = Vec::with_capacity(result.values.len());
    for values in &result.values {
        let text = |i: usize| values.get(index[i]).and_then(value_as_string);
        let (Some(zone), Some(name), Some(record_type), Some(content)) =
            (text(0), text(1), text(2), text(3))
        else {
            warn!("Skipping rqlite row with missing columns");
            continue;
        };
        let ttl = values.get(index[4]).and_then(Value::as_i64);
        rows.push((zone, name, record_type, content, ttl));
    }
    Ok(rows)
}

/// Extracts reachable API addresses from a `/nodes` body, in either the
/// `{"nodes": [...]}` or the older `{"<id>": {...}}` layout.
pub fn parse_nodes(bytes: &[u8], scheme: &str) -> Result<Vec<String>, DomainError> {
    let body: Value = serde_json::from_slice(bytes)
        .map_err(|e| DomainError::DatabaseError(format!("Malformed /nodes response: {}", e)))?;

    let entries: Vec<&Value> = match body.get("nodes") {
        Some(Value::Array(list)) => list.iter().collect(),
        _ => match &body {
            Value::Object(map) => map.values().collect(),
            _ => Vec::new(),
        },
    };

    let mut nodes: Vec<String> = entries
        .into_iter()
        .filter(|node| node.get("reachable").and_then(Value::as_bool).unwrap_or(false))
        .filter_map(|node| node.get("api_addr").and_then(Value::as_str))
        .filter(|addr| !addr.is_empty())
        .map(|addr| {
            let addr = addr.trim_end_matches('/');
            if addr.contains("://") {
                addr.to_string()
            } else {
                format!("{}://{}", scheme, addr)
            }
        })
        .collect();
    nodes.sort();
    nodes.dedup();
    Ok(nodes)
}

#[async_trait]
impl ClusterTopologyPort for RqliteCluster {
    async fn sync_nodes(&self) -> Result<ClusterSyncOutcome, DomainError> {
        let mut last_error = None;

        for node in self.rotation() {
            let builder = self.request(
                reqwest::Method::GET,
                format!("{}/nodes?nonvoters&ver=2", node),
            );
            let discovered = match self.send(builder, &node).await {
                Ok(bytes) => parse_nodes(&bytes, &self.dsn.scheme),
                Err(e) => Err(e),
            };

            match discovered {
                Ok(discovered) if discovered.is_empty() => {
                    debug!(node = %node, "Cluster discovery returned no reachable nodes");
                    let current = self.nodes.load();
                    return Ok(ClusterSyncOutcome {
                        nodes: current.len(),
                        changed: false,
                    });
                }
                Ok(discovered) => {
                    let current = self.nodes.load_full();
                    let mut sorted_current = (*current).clone();
                    sorted_current.sort();
                    let changed = sorted_current != discovered;
                    if changed {
                        info!(nodes = ?discovered, "rqlite cluster membership changed");
                        self.nodes.store(Arc::new(discovered.clone()));
                    }
                    return Ok(ClusterSyncOutcome {
                        nodes: discovered.len(),
                        changed,
                    });
                }
                Err(e) => {
                    debug!(node = %node, error = %e, "Cluster discovery attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DomainError::ConnectionFailed("no rqlite nodes configured".to_string())
        }))
    }
}

/// Opens [`RqliteConnection`]s, rotating across the cluster's nodes.
pub struct RqliteManager {
    cluster: Arc<RqliteCluster>,
}

impl RqliteManager {
    pub fn new(cluster: Arc<RqliteCluster>) -> Self {
        Self { cluster }
    }

    pub fn cluster(&self) -> &Arc<RqliteCluster> {
        &self.cluster
    }
}

#[async_trait]
impl ManageConnection for RqliteManager {
    type Connection = RqliteConnection;

    async fn connect(&self) -> Result<Self::Connection, DomainError> {
        let mut last_error = None;

        for node in self.cluster.rotation() {
            match self.cluster.probe(&node).await {
                Ok(()) => {
                    debug!(node = %node, "Connected to rqlite node");
                    return Ok(RqliteConnection {
                        cluster: Arc::clone(&self.cluster),
                        node,
                    });
                }
                Err(e) => {
                    warn!(node = %node, error = %e, "rqlite node unavailable, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DomainError::ConnectionFailed("no rqlite nodes configured".to_string())
        }))
    }
}

pub struct RqliteConnection {
    cluster: Arc<RqliteCluster>,
    node: String,
}

impl RqliteConnection {
    pub fn node(&self) -> &str {
        &self.node
    }
}

#[async_trait]
impl BackendConnection for RqliteConnection {
    async fn ping(&mut self) -> Result<(), DomainError> {
        self.cluster.probe(&self.node).await
    }

    async fn fetch_rows(&mut self, statement: &Statement) -> Result<Vec<RecordRow>, DomainError> {
        let url = format!(
            "{}/db/query?level={}",
            self.node,
            self.cluster.dsn.level.as_str()
        );
        let bytes = self.cluster.post_statement(&self.node, url, statement).await?;
        parse_record_rows(&bytes)
    }

    async fn execute(&mut self, statement: &Statement) -> Result<(), DomainError> {
        let url = format!("{}/db/execute", self.node);
        let bytes = self.cluster.post_statement(&self.node, url, statement).await?;
        decode_response(&bytes).map(|_| ())
    }
}
