//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub annotation: AnnotationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The browser faview attaches to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome remote debugging endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// The first tab whose URL starts with this prefix is attached.
    #[serde(default = "default_target_url_prefix")]
    pub target_url_prefix: String,

    /// Upper bound for a single CDP command, including in-page fetches.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:9222".to_string()
}

fn default_target_url_prefix() -> String {
    "https://www.pixiv.net/".to_string()
}

fn default_call_timeout_secs() -> u64 {
    30
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            target_url_prefix: default_target_url_prefix(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    1000
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

/// How catalog requests reach the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// `fetch()` inside the attached tab, with the viewer's session.
    #[default]
    Page,
    /// Direct HTTP requests from faview.
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub transport: TransportKind,

    /// API origin for the `http` transport.
    #[serde(default = "default_site_url")]
    pub base_url: String,

    /// Request timeout for the `http` transport. None waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            base_url: default_site_url(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

fn default_site_url() -> String {
    "https://www.pixiv.net".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    #[serde(default = "default_heading_level")]
    pub heading_level: u8,

    #[serde(default = "default_section_depth")]
    pub section_depth: usize,

    #[serde(default = "default_link_color")]
    pub link_color: String,

    #[serde(default = "default_site_url")]
    pub artwork_base_url: String,
}

fn default_heading_level() -> u8 {
    2
}

fn default_section_depth() -> usize {
    3
}

fn default_link_color() -> String {
    "red".to_string()
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            heading_level: default_heading_level(),
            section_depth: default_section_depth(),
            link_color: default_link_color(),
            artwork_base_url: default_site_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,

    /// Log file directory. Defaults to `~/.faview/logs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            dir: None,
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
