//! Tracing setup and the foreground annotation loop.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use faview_browser::CdpHostPage;
use faview_catalog::PaginatedCatalogFetcher;
use faview_config::{Config, LoggingConfig};
use faview_runloop::PollingOrchestrator;

use crate::adapters::{attach_browser, catalog_transport, log_dir, orchestrator_config};

/// Initialize tracing with console and file output.
///
/// Log files are written to `~/.faview/logs/` (or `logging.dir`) with daily rotation.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = log_dir(logging);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("faview")
        .filename_suffix("log")
        .max_log_files(14)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the background writer alive for the program duration.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Attach to the viewer's tab and annotate artist pages until Ctrl-C.
pub(crate) async fn run_annotator(config: Config, endpoint: String) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting faview v{}", env!("CARGO_PKG_VERSION"));
    info!("Connecting to browser at {}", endpoint);

    let attachment = attach_browser(&config.browser, &endpoint).await?;
    let transport = catalog_transport(&config.catalog, Some(&attachment.session))?;
    info!("Catalog transport: {}", transport.name());

    let page = Arc::new(CdpHostPage::new(attachment.session.clone()));
    let catalog = Arc::new(PaginatedCatalogFetcher::new(transport));
    let orchestrator = PollingOrchestrator::start(page, catalog, orchestrator_config(&config)).await?;

    let cancel = CancellationToken::new();
    let loop_handle = tokio::spawn(orchestrator.run(cancel.clone()));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
    cancel.cancel();
    loop_handle.await?;

    info!("faview stopped");
    Ok(())
}
