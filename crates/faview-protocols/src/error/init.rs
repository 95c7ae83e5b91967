//! Startup errors.

use thiserror::Error;

/// Fatal errors raised before the polling loop starts.
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Page locale not found: the document root has no lang attribute")]
    MissingLocale,

    #[error("Unsupported page locale: {0}")]
    UnsupportedLocale(String),

    #[error("Host page unavailable: {0}")]
    HostUnavailable(String),
}
