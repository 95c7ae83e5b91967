//! faview - marks your bookmarked works on pixiv artist pages
//!
//! Main entry point for the faview CLI.

mod adapters;
mod cli;
mod cmd_inspect;
mod runner;

use clap::Parser;
use tracing::{info, warn};

use faview_config::ConfigValidator;

use crate::adapters::load_config;
use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Commands::Classify { url }) = &cli.command {
        cmd_inspect::handle_classify(url);
        return Ok(());
    }

    let (config, defaulted) = load_config(&cli.config)?;

    if let Some(Commands::CheckConfig) = &cli.command {
        return cmd_inspect::handle_check_config(&cli.config, &config, defaulted);
    }

    runner::init_tracing(&config.logging)?;
    if defaulted {
        info!("{} not found, using built-in defaults", cli.config.display());
    }

    let validation = ConfigValidator::validate(&config);
    for warning in &validation.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    if let Some(e) = validation.into_error() {
        return Err(e.into());
    }

    match cli.command {
        None => {
            let endpoint = config.browser.endpoint.clone();
            runner::run_annotator(config, endpoint).await
        }
        Some(Commands::Run { endpoint }) => {
            let endpoint = endpoint.unwrap_or_else(|| config.browser.endpoint.clone());
            runner::run_annotator(config, endpoint).await
        }
        Some(Commands::Bookmarks { artist_id, lang }) => {
            let endpoint = config.browser.endpoint.clone();
            cmd_inspect::handle_bookmarks(&config, &endpoint, &artist_id, &lang).await
        }
        Some(Commands::Classify { .. }) | Some(Commands::CheckConfig) => Ok(()),
    }
}
