//! CLI definitions for faview.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// faview CLI.
#[derive(Parser)]
#[command(name = "faview")]
#[command(about = "Marks your bookmarked works on pixiv artist pages")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Attach to the browser and annotate artist pages until Ctrl-C (default)
    Run {
        /// Chrome remote debugging endpoint (overrides browser.endpoint)
        #[arg(long, env = "FAVIEW_CDP_ENDPOINT")]
        endpoint: Option<String>,
    },

    /// Classify a URL as artist page or not
    Classify {
        /// Page URL or path
        url: String,
    },

    /// Fetch an artist's catalog once and print the bookmarked works as JSON
    Bookmarks {
        /// Artist (user) id
        artist_id: String,

        /// Catalog language
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Load and validate the configuration file
    CheckConfig,
}
