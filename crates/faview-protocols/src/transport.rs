//! Catalog transport protocol.
//!
//! A transport issues a single GET against the catalog API and hands back the
//! decoded JSON document. Pagination lives above this seam.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CatalogFetchError;

/// The two catalog API endpoints in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEndpoint {
    /// `/ajax/user/{artistId}/profile/all` - every work id of an artist.
    ProfileAll,
    /// `/ajax/user/{artistId}/profile/illusts` - details for up to 100 ids.
    ProfileIllusts,
}

impl CatalogEndpoint {
    /// Endpoint label with the artist id elided, for diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProfileAll => "/ajax/user/UID/profile/all",
            Self::ProfileIllusts => "/ajax/user/UID/profile/illusts",
        }
    }

    /// Request path for the given artist, without the query string.
    pub fn path(&self, artist_id: &str) -> String {
        match self {
            Self::ProfileAll => format!("/ajax/user/{}/profile/all", artist_id),
            Self::ProfileIllusts => format!("/ajax/user/{}/profile/illusts", artist_id),
        }
    }
}

impl fmt::Display for CatalogEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Issues one catalog request.
///
/// Implementations must map any non-2xx response to
/// [`CatalogFetchError::Status`] tagged with `endpoint`.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    /// Transport name, used in logs.
    fn name(&self) -> &str;

    /// GET `path_and_query` (origin-relative) and decode the body as JSON.
    async fn get_json(
        &self,
        endpoint: CatalogEndpoint,
        path_and_query: &str,
    ) -> Result<Value, CatalogFetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(
            CatalogEndpoint::ProfileAll.path("12345"),
            "/ajax/user/12345/profile/all"
        );
        assert_eq!(
            CatalogEndpoint::ProfileIllusts.path("12345"),
            "/ajax/user/12345/profile/illusts"
        );
    }

    #[test]
    fn test_endpoint_display_elides_artist() {
        assert_eq!(
            CatalogEndpoint::ProfileIllusts.to_string(),
            "/ajax/user/UID/profile/illusts"
        );
    }
}
