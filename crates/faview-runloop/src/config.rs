//! Configuration for the polling orchestrator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Tick interval in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Level of the catalog section heading (2 for `h2`).
    #[serde(default = "default_heading_level")]
    pub heading_level: u8,

    /// How many ancestors above the heading the section container sits.
    #[serde(default = "default_section_depth")]
    pub section_depth: usize,

    /// CSS color of the inserted links.
    #[serde(default = "default_link_color")]
    pub link_color: String,

    /// Origin that `/artworks/{id}` links are built on.
    #[serde(default = "default_artwork_base_url")]
    pub artwork_base_url: String,
}

fn default_interval_ms() -> u64 {
    1000
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

fn default_artwork_base_url() -> String {
    "https://www.pixiv.net".to_string()
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            heading_level: default_heading_level(),
            section_depth: default_section_depth(),
            link_color: default_link_color(),
            artwork_base_url: default_artwork_base_url(),
        }
    }
}

impl OrchestratorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(1));
        assert_eq!(config.heading_level, 2);
        assert_eq!(config.section_depth, 3);
        assert_eq!(config.link_color, "red");
        assert_eq!(config.artwork_base_url, "https://www.pixiv.net");
    }
}
