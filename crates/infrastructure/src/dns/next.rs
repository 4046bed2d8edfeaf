//! Handlers for queries outside every known zone.

use super::response::ResponseBuilder;
use async_trait::async_trait;
use hickory_proto::op::{Message, ResponseCode};
use rqlite_dns_application::ports::NextHandler;
use rqlite_dns_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// Relays the query over UDP to a single upstream and returns its reply verbatim.
pub struct ForwardHandler {
    upstream: SocketAddr,
    timeout: Duration,
}

impl ForwardHandler {
    pub fn new(upstream: SocketAddr, timeout: Duration) -> Self {
        Self { upstream, timeout }
    }

    pub fn upstream(&self) -> SocketAddr {
        self.upstream
    }

    async fn exchange(&self, query: &[u8], id: u16) -> Result<Vec<u8>, DomainError> {
        let bind_addr: SocketAddr = if self.upstream.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainError::UpstreamError(format!("Failed to bind UDP socket: {}", e))
        })?;
        socket.connect(self.upstream).await.map_err(|e| {
            DomainError::UpstreamError(format!("Failed to connect to {}: {}", self.upstream, e))
        })?;

        socket.send(query).await.map_err(|e| {
            DomainError::UpstreamError(format!("Failed to send query to {}: {}", self.upstream, e))
        })?;

        let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let len = socket.recv(&mut buf).await.map_err(|e| {
                DomainError::UpstreamError(format!(
                    "Failed to receive response from {}: {}",
                    self.upstream, e
                ))
            })?;

            if len >= 2 && u16::from_be_bytes([buf[0], buf[1]]) == id {
                buf.truncate(len);
                return Ok(buf);
            }
            warn!(upstream = %self.upstream, "Discarding upstream response with mismatched id");
        }
    }
}

#[async_trait]
impl NextHandler for ForwardHandler {
    fn name(&self) -> &'static str {
        "forward"
    }

    async fn handle(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        if query.len() < 2 {
            return Err(DomainError::InvalidDnsMessage("query too short".to_string()));
        }
        let id = u16::from_be_bytes([query[0], query[1]]);

        let response = tokio::time::timeout(self.timeout, self.exchange(query, id))
            .await
            .map_err(|_| {
                DomainError::UpstreamError(format!("Timeout waiting for {}", self.upstream))
            })??;

        debug!(upstream = %self.upstream, bytes = response.len(), "Forwarded query answered");
        Ok(response)
    }
}

/// Answers REFUSED; used when no upstream is configured.
pub struct RefuseHandler;

#[async_trait]
impl NextHandler for RefuseHandler {
    fn name(&self) -> &'static str {
        "refuse"
    }

    async fn handle(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        let request = Message::from_vec(query)
            .map_err(|e| DomainError::InvalidDnsMessage(e.to_string()))?;
        ResponseBuilder::serialize(&ResponseBuilder::empty(&request, ResponseCode::Refused))
    }
}
