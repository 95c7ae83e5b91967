//! Catalog fetch errors.

use thiserror::Error;

use crate::transport::CatalogEndpoint;

/// A failed catalog fetch. Any of these discards the whole attempt.
#[derive(Debug, Error)]
pub enum CatalogFetchError {
    #[error("Catalog API [{endpoint}] failed with status {status}")]
    Status { endpoint: CatalogEndpoint, status: u16 },

    #[error("Catalog request failed: {0}")]
    Transport(String),

    #[error("Catalog API reported an error: {0}")]
    Api(String),

    #[error("Malformed catalog payload: {0}")]
    Decode(String),
}

impl CatalogFetchError {
    /// The HTTP status, when the failure was a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogFetchError {
    fn from(e: serde_json::Error) -> Self {
        CatalogFetchError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = CatalogFetchError::Status {
            endpoint: CatalogEndpoint::ProfileAll,
            status: 404,
        };
        let display = err.to_string();
        assert!(display.contains("/ajax/user/UID/profile/all"));
        assert!(display.contains("404"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_transport_error_has_no_status() {
        let err = CatalogFetchError::Transport("connection reset".to_string());
        assert!(err.to_string().contains("connection reset"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_api_error() {
        let err = CatalogFetchError::Api("user not found".to_string());
        assert!(err.to_string().contains("user not found"));
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CatalogFetchError = serde_err.into();
        assert!(matches!(err, CatalogFetchError::Decode(_)));
    }
}
