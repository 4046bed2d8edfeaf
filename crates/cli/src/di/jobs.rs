use super::{Repositories, UseCases};
use rqlite_dns_domain::ResolverConfig;
use rqlite_dns_jobs::{ClusterSyncJob, JobRunner, ZoneRefreshJob};
use std::sync::Arc;

pub fn build_job_runner(
    repos: &Repositories,
    use_cases: &UseCases,
    config: &ResolverConfig,
) -> JobRunner {
    let zone_refresh = ZoneRefreshJob::new(use_cases.zones.clone(), Arc::clone(&repos.records))
        .with_interval(config.zone_update_interval);

    let mut runner = JobRunner::new().with_zone_refresh(zone_refresh);

    if let Some(cluster) = &repos.cluster {
        runner = runner.with_cluster_sync(
            ClusterSyncJob::new(Arc::clone(cluster)).with_interval(config.zone_update_interval),
        );
    }

    runner
}
