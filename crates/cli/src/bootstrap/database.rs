use rqlite_dns_domain::ResolverConfig;
use rqlite_dns_infrastructure::database::Backend;
use tracing::{error, info};

/// Opens the backend and proves it reachable. Any failure here aborts startup.
pub async fn init_backend(config: &ResolverConfig) -> anyhow::Result<Backend> {
    info!(table = %config.table_name(), "Initializing record store");

    let backend = Backend::open(config).map_err(|e| {
        error!(error = %e, "Failed to open record store");
        anyhow::anyhow!("Failed to open record store: {}", e)
    })?;

    if let Backend::Sqlite { store } = &backend {
        store.create_schema().await.map_err(|e| {
            error!(error = %e, "Failed to create sqlite schema");
            anyhow::anyhow!("Failed to create sqlite schema: {}", e)
        })?;
    }

    backend.health_check().await.map_err(|e| {
        error!(error = %e, "Backend health check failed");
        anyhow::anyhow!("Backend is unreachable: {}", e)
    })?;

    let status = backend.status();
    info!(
        open = status.open,
        idle = status.idle,
        max_open = status.max_open,
        "Record store ready"
    );

    Ok(backend)
}
