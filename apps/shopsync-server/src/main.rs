mod config;
mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use sea_orm_migration::MigratorTrait;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use shopsync::api::rest::{router, AppState, SyncReportDto};
use shopsync::domain::model::SyncStatus;
use shopsync::domain::ports::{ShopSourceFactory, TenantsRepository};
use shopsync::infra::source::RestSourceFactory;
use shopsync::infra::storage::{
    self, migrations::Migrator, SeaOrmCustomersRepository, SeaOrmOrdersRepository,
    SeaOrmProductsRepository, SeaOrmTenantsRepository,
};
use shopsync::scheduler::{InFlightTenants, SyncScheduler};
use shopsync::SyncService;

use config::AppConfig;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// ShopSync Server - multi-tenant Shopify data synchronization
#[derive(Parser)]
#[command(name = "shopsync-server")]
#[command(about = "ShopSync Server - multi-tenant Shopify data synchronization")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (JSON, secrets redacted) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server and the sync scheduler
    Run,
    /// Validate configuration and exit
    Check,
    /// Run one full sync for a tenant and exit
    SyncNow {
        /// Tenant id to sync
        #[arg(long)]
        tenant: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config {
        if !Path::new(path).is_file() {
            anyhow::bail!("config file does not exist: {}", path.to_string_lossy());
        }
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging, cli.verbose);

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
        Commands::SyncNow { tenant } => sync_now(config, tenant).await,
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    // Load already validated shapes and defaults; what remains is the
    // parts only touched at runtime.
    RestSourceFactory::new(config.sync.source.clone())
        .context("source client configuration is invalid")?;
    println!("Configuration is valid");
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// Everything a sync run needs, wired against one database connection.
struct Services {
    service: Arc<SyncService>,
    tenants: Arc<dyn TenantsRepository>,
    in_flight: Arc<InFlightTenants>,
}

async fn build_services(config: &AppConfig) -> Result<Services> {
    let db = storage::connect(&config.database.dsn)
        .await
        .with_context(|| format!("cannot connect to database: {}", config.database.dsn))?;
    Migrator::up(&db, None).await.context("migrations failed")?;

    let tenants: Arc<dyn TenantsRepository> = Arc::new(SeaOrmTenantsRepository::new(db.clone()));
    for tenant in &config.tenants {
        tenants
            .upsert_config(&tenant.clone().into_tenant())
            .await
            .with_context(|| format!("cannot seed tenant {}", tenant.id))?;
    }
    tracing::info!(tenants = config.tenants.len(), "tenant registry seeded");

    let source_factory: Arc<dyn ShopSourceFactory> = Arc::new(
        RestSourceFactory::new(config.sync.source.clone())
            .context("cannot build source client")?,
    );
    let service = Arc::new(SyncService::new(
        source_factory,
        Arc::new(SeaOrmCustomersRepository::new(db.clone())),
        Arc::new(SeaOrmOrdersRepository::new(db.clone())),
        Arc::new(SeaOrmProductsRepository::new(db.clone())),
        Arc::clone(&tenants),
    ));

    Ok(Services {
        service,
        tenants,
        in_flight: Arc::new(InFlightTenants::default()),
    })
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("ShopSync Server starting");
    let services = build_services(&config).await?;

    let cancel = CancellationToken::new();
    let scheduler = SyncScheduler::new(
        Arc::clone(&services.service),
        Arc::clone(&services.tenants),
        Arc::clone(&services.in_flight),
        config.sync.interval,
    );
    let scheduler_cancel = cancel.clone();
    let scheduler_task = tokio::spawn(async move { scheduler.run(scheduler_cancel).await });

    let app = router(AppState {
        service: services.service,
        tenants: services.tenants,
        in_flight: services.in_flight,
    });
    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %config.server.bind_addr, "HTTP server listening");

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            tracing::info!("shutdown signal received");
            cancel.cancel();
        }
    });

    let serve_cancel = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { serve_cancel.cancelled().await })
        .await
        .context("HTTP server failed")?;

    cancel.cancel();
    scheduler_task.await.context("scheduler task panicked")?;
    tracing::info!("ShopSync Server stopped");
    Ok(())
}

async fn sync_now(config: AppConfig, tenant_id: Uuid) -> Result<()> {
    let services = build_services(&config).await?;
    let report = services
        .service
        .sync_now(tenant_id)
        .await
        .with_context(|| format!("sync failed for tenant {tenant_id}"))?;

    let status = report.status();
    println!(
        "{}",
        serde_json::to_string_pretty(&SyncReportDto::from(report))?
    );
    if status == SyncStatus::Failed {
        anyhow::bail!("sync failed for every resource kind");
    }
    Ok(())
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            tracing::error!(error = %e, "cannot install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
