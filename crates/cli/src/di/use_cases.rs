use super::Repositories;
use rqlite_dns_application::use_cases::ResolveQueryUseCase;
use rqlite_dns_domain::ResolverConfig;
use rqlite_dns_infrastructure::dns::ZoneCache;
use std::sync::Arc;
use tracing::info;

pub struct UseCases {
    pub zones: Arc<ZoneCache>,
    pub resolve: Arc<ResolveQueryUseCase>,
}

impl UseCases {
    /// Loads the first zone snapshot; serving starts only after it succeeds.
    pub async fn new(repos: &Repositories, config: &ResolverConfig) -> anyhow::Result<Self> {
        let zones = ZoneCache::load(Arc::clone(&repos.records))
            .await
            .map_err(|e| anyhow::anyhow!("Initial zone load failed: {}", e))?;
        let zones = Arc::new(zones);

        info!(default_ttl = config.ttl, "Resolver ready");

        Ok(Self {
            resolve: Arc::new(ResolveQueryUseCase::new(
                Arc::clone(&repos.records),
                zones.clone(),
                config.ttl,
            )),
            zones,
        })
    }
}
