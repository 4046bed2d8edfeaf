use super::UseCases;
use rqlite_dns_application::ports::NextHandler;
use rqlite_dns_domain::Config;
use rqlite_dns_infrastructure::dns::{DnsRequestHandler, ForwardHandler, RefuseHandler};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct DnsServices {
    pub handler: Arc<DnsRequestHandler>,
}

impl DnsServices {
    pub fn new(config: &Config, use_cases: &UseCases) -> anyhow::Result<Self> {
        let next = Self::build_next_handler(config)?;
        info!(next = next.name(), "Non-authoritative queries go to next handler");

        let handler = DnsRequestHandler::new(
            Arc::clone(&use_cases.resolve),
            next,
            Duration::from_millis(config.server.query_timeout_ms),
        );

        Ok(Self {
            handler: Arc::new(handler),
        })
    }

    fn build_next_handler(config: &Config) -> anyhow::Result<Arc<dyn NextHandler>> {
        match &config.next.upstream {
            Some(upstream) => {
                let addr: SocketAddr = upstream.parse()?;
                Ok(Arc::new(ForwardHandler::new(
                    addr,
                    Duration::from_millis(config.next.timeout_ms),
                )))
            }
            None => Ok(Arc::new(RefuseHandler)),
        }
    }
}
