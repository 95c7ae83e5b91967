//! Catalog transport that runs `fetch()` inside the host tab.
//!
//! Requests carry the tab's cookies, so bookmark data reflects the logged-in
//! viewer without faview ever handling credentials.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use faview_protocols::{CatalogEndpoint, CatalogFetchError, CatalogTransport};

use crate::cdp::PageSession;
use crate::scripts;

#[derive(Debug, Deserialize)]
struct FetchOutcome {
    status: u16,
    #[serde(default)]
    body: Value,
    #[serde(default)]
    invalid: bool,
}

/// In-page catalog transport.
pub struct PageFetchTransport {
    session: Arc<PageSession>,
}

impl PageFetchTransport {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self { session }
    }
}

fn into_json(endpoint: CatalogEndpoint, value: Value) -> Result<Value, CatalogFetchError> {
    let outcome: FetchOutcome = serde_json::from_value(value)?;
    if !(200..300).contains(&outcome.status) {
        return Err(CatalogFetchError::Status {
            endpoint,
            status: outcome.status,
        });
    }
    if outcome.invalid {
        return Err(CatalogFetchError::Decode(format!(
            "{} did not return JSON",
            endpoint
        )));
    }
    Ok(outcome.body)
}

#[async_trait]
impl CatalogTransport for PageFetchTransport {
    fn name(&self) -> &str {
        "page"
    }

    async fn get_json(
        &self,
        endpoint: CatalogEndpoint,
        path_and_query: &str,
    ) -> Result<Value, CatalogFetchError> {
        trace!("in-page GET {}", path_and_query);
        let value = self
            .session
            .evaluate(&scripts::fetch_json(path_and_query))
            .await?;
        into_json(endpoint, value)
    }
}
