//! Wiring between the configuration and the runtime crates.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use faview_browser::{CdpClient, CdpError, PageFetchTransport, PageSession};
use faview_catalog::{HttpTransport, HttpTransportOptions};
use faview_config::{
    BrowserConfig, CatalogConfig, Config, ConfigError, ConfigLoader, LoggingConfig, TransportKind,
};
use faview_protocols::{CatalogFetchError, CatalogTransport};
use faview_runloop::OrchestratorConfig;

/// Get the .faview directory path.
pub(crate) fn faview_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".faview"))
        .unwrap_or_else(|| PathBuf::from(".faview"))
}

/// Log directory: `logging.dir` if set, else `~/.faview/logs`.
pub(crate) fn log_dir(logging: &LoggingConfig) -> PathBuf {
    logging
        .dir
        .as_deref()
        .map(|dir| PathBuf::from(ConfigLoader::expand_path(dir)))
        .unwrap_or_else(|| faview_dir().join("logs"))
}

/// Load the config file, falling back to defaults when it does not exist.
///
/// Returns whether the defaults were used.
pub(crate) fn load_config(path: &Path) -> Result<(Config, bool), ConfigError> {
    match ConfigLoader::load(path) {
        Ok(config) => Ok((config, false)),
        Err(ConfigError::NotFound(_)) => Ok((Config::default(), true)),
        Err(e) => Err(e),
    }
}

pub(crate) fn orchestrator_config(config: &Config) -> OrchestratorConfig {
    OrchestratorConfig {
        interval_ms: config.poll.interval_ms,
        heading_level: config.annotation.heading_level,
        section_depth: config.annotation.section_depth,
        link_color: config.annotation.link_color.clone(),
        artwork_base_url: config.annotation.artwork_base_url.clone(),
    }
}

pub(crate) fn http_transport(catalog: &CatalogConfig) -> Result<HttpTransport, CatalogFetchError> {
    let mut options = HttpTransportOptions {
        timeout: catalog.timeout_secs.map(Duration::from_secs),
        ..Default::default()
    };
    if let Some(ref user_agent) = catalog.user_agent {
        options.user_agent = user_agent.clone();
    }
    HttpTransport::new(&catalog.base_url, options)
}

/// A CDP connection plus the session attached to the viewer's tab.
///
/// The client owns the WebSocket reader; it must outlive the session.
pub(crate) struct BrowserAttachment {
    _client: CdpClient,
    pub session: Arc<PageSession>,
}

/// Connect to the browser and attach to the first tab under `target_url_prefix`.
pub(crate) async fn attach_browser(browser: &BrowserConfig, endpoint: &str) -> Result<BrowserAttachment, CdpError> {
    let client = CdpClient::connect(endpoint, Duration::from_secs(browser.call_timeout_secs)).await?;
    let tab = client.find_page(&browser.target_url_prefix).await?;
    info!("Attaching to tab {} ({})", tab.id, tab.url);

    let session = client.attach_page(&tab.id).await?;
    Ok(BrowserAttachment {
        _client: client,
        session: Arc::new(session),
    })
}

/// The catalog transport selected by `catalog.transport`.
///
/// The page transport needs an attached tab; without one it is an error.
pub(crate) fn catalog_transport(
    catalog: &CatalogConfig,
    session: Option<&Arc<PageSession>>,
) -> Result<Arc<dyn CatalogTransport>, Box<dyn std::error::Error>> {
    match (catalog.transport, session) {
        (TransportKind::Http, _) => {
            if catalog.timeout_secs.is_none() {
                warn!("HTTP catalog transport has no timeout configured");
            }
            Ok(Arc::new(http_transport(catalog)?))
        }
        (TransportKind::Page, Some(session)) => Ok(Arc::new(PageFetchTransport::new(session.clone()))),
        (TransportKind::Page, None) => Err("page transport requires an attached browser tab".into()),
    }
}
