//! One-shot inspection commands: classify, bookmarks, check-config.

use std::path::Path;

use faview_catalog::PaginatedCatalogFetcher;
use faview_config::{Config, ConfigValidator, TransportKind, ValidationResult};
use faview_protocols::{ArtistId, CatalogSource, Lang, NavigationClassification, classify};

use crate::adapters::{BrowserAttachment, attach_browser, catalog_transport};

pub(crate) fn describe_classification(url: &str) -> String {
    match classify(url) {
        NavigationClassification::ArtistPage { artist_id } => format!("artist page (artist {})", artist_id),
        NavigationClassification::NotArtistPage => "not an artist page".to_string(),
    }
}

/// Print how a URL is classified.
pub(crate) fn handle_classify(url: &str) {
    println!("{}", describe_classification(url));
}

/// Fetch one artist's catalog through the configured transport and print
/// the bookmarked works as JSON.
pub(crate) async fn handle_bookmarks(
    config: &Config,
    endpoint: &str,
    artist_id: &str,
    lang: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let artist = ArtistId::new(artist_id).ok_or_else(|| format!("invalid artist id: {}", artist_id))?;
    let lang: Lang = lang.parse()?;

    // Only the page transport needs the browser.
    let attachment: Option<BrowserAttachment> = match config.catalog.transport {
        TransportKind::Page => Some(attach_browser(&config.browser, endpoint).await?),
        TransportKind::Http => None,
    };
    let transport = catalog_transport(&config.catalog, attachment.as_ref().map(|a| &a.session))?;

    let fetcher = PaginatedCatalogFetcher::new(transport);
    let catalog = fetcher.fetch_catalog(&artist, lang).await?;
    let summary = catalog.bookmark_summary();

    println!("{}", serde_json::to_string_pretty(&summary)?);
    eprintln!("{} works, {} bookmarked", catalog.len(), summary.count);
    Ok(())
}

pub(crate) fn render_validation(path: &Path, defaulted: bool, result: &ValidationResult) -> String {
    let mut out = String::new();
    if defaulted {
        out.push_str(&format!("{} not found, using built-in defaults\n", path.display()));
    } else {
        out.push_str(&format!("Loaded {}\n", path.display()));
    }
    for error in &result.errors {
        out.push_str(&format!("error: {}: {}\n", error.path, error.message));
    }
    for warning in &result.warnings {
        out.push_str(&format!("warning: {}: {}\n", warning.path, warning.message));
    }
    if result.is_valid() {
        out.push_str("Configuration is valid\n");
    }
    out
}

/// Validate the configuration and print the findings.
pub(crate) fn handle_check_config(path: &Path, config: &Config, defaulted: bool) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config);
    print!("{}", render_validation(path, defaulted, &result));
    match result.into_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
