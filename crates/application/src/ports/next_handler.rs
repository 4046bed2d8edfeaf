use async_trait::async_trait;
use rqlite_dns_domain::DomainError;

/// Receives queries for names outside every known zone.
///
/// Works on raw wire messages so a forwarder can relay the upstream reply
/// untouched.
#[async_trait]
pub trait NextHandler: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, query: &[u8]) -> Result<Vec<u8>, DomainError>;
}
