use clap::Parser;
use rqlite_dns_domain::CliOverrides;
use rqlite_dns_infrastructure::repositories::schema_statements;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "rqlite-dns")]
#[command(version)]
#[command(about = "Authoritative DNS answers from zone records stored in rqlite")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Data source, replaces the `dsn` directive
    #[arg(long)]
    dsn: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the records table DDL and exit
    #[arg(long)]
    print_schema: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind.clone(),
        log_level: cli.log_level.clone(),
        dsn: cli.dsn.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    let resolver_config = config.resolver_config()?;

    if cli.print_schema {
        for ddl in schema_statements(&resolver_config.table_name()) {
            println!("{};", ddl);
        }
        return Ok(());
    }

    bootstrap::init_logging(&config.logging);
    config.validate()?;

    info!("Starting rqlite DNS server v{}", env!("CARGO_PKG_VERSION"));

    let backend = bootstrap::init_backend(&resolver_config).await?;

    let repos = di::Repositories::new(backend);
    let use_cases = di::UseCases::new(&repos, &resolver_config).await?;
    let dns_services = di::DnsServices::new(&config, &use_cases)?;

    let shutdown = CancellationToken::new();

    let jobs = di::build_job_runner(&repos, &use_cases, &resolver_config)
        .with_shutdown_token(shutdown.clone())
        .start()
        .await;

    let dns_addr = format!("{}:{}", config.server.bind_address, config.server.dns_port);
    let server_options = server::ServerOptions {
        udp_workers: config.server.udp_workers,
        tcp_idle_timeout: Duration::from_secs(config.server.tcp_idle_timeout_secs),
    };
    let server_shutdown = shutdown.clone();
    let dns_server = tokio::spawn(async move {
        if let Err(e) = server::start_dns_server(
            dns_addr,
            dns_services.handler,
            server_options,
            server_shutdown,
        )
        .await
        {
            error!(error = %e, "DNS server error");
        }
    });

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        }
        _ = shutdown.cancelled() => {}
    }

    shutdown.cancel();
    let _ = dns_server.await;
    for job in jobs {
        let _ = job.await;
    }
    repos.backend.close();

    info!("Server shutdown complete");
    Ok(())
}
