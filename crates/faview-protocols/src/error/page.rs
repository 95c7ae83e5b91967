//! Host page errors.

use thiserror::Error;

/// Errors raised while reading or mutating the host page.
///
/// These never abort the polling loop; a failing tick is retried on the next.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Page script failed: {0}")]
    Script(String),

    #[error("Heading {0} is no longer present")]
    HeadingGone(usize),

    #[error("Section container not found {depth} levels above heading {index}")]
    SectionNotFound { index: usize, depth: usize },

    #[error("Page detached: {0}")]
    Detached(String),
}
