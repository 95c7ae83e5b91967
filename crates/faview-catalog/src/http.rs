//! reqwest-backed catalog transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::trace;
use url::Url;

use faview_protocols::{CatalogEndpoint, CatalogFetchError, CatalogTransport};

/// Options for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportOptions {
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for HttpTransportOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: format!("faview/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Catalog transport that talks to the API directly over HTTP.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url` (e.g. `https://www.pixiv.net`).
    pub fn new(base_url: &str, options: HttpTransportOptions) -> Result<Self, CatalogFetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CatalogFetchError::Transport(format!("Invalid base URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .user_agent(options.user_agent)
            .default_headers(headers);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CatalogFetchError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl CatalogTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn get_json(
        &self,
        endpoint: CatalogEndpoint,
        path_and_query: &str,
    ) -> Result<Value, CatalogFetchError> {
        let url = self
            .base_url
            .join(path_and_query)
            .map_err(|e| CatalogFetchError::Transport(format!("Invalid request path: {}", e)))?;
        trace!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogFetchError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogFetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| CatalogFetchError::Transport(format!("Failed to read body: {}", e)))?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_invalid_base_url() {
        let result = HttpTransport::new("not a url", HttpTransportOptions::default());
        assert!(matches!(result, Err(CatalogFetchError::Transport(_))));
    }

    #[test]
    fn test_default_options() {
        let options = HttpTransportOptions::default();
        assert!(options.timeout.is_none());
        assert!(options.user_agent.starts_with("faview/"));
    }

    #[tokio::test]
    async fn test_get_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ajax/user/1/profile/all"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"body": {}})))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(&mock_server.uri(), HttpTransportOptions::default()).unwrap();
        let value = transport
            .get_json(CatalogEndpoint::ProfileAll, "/ajax/user/1/profile/all?lang=en")
            .await
            .unwrap();
        assert!(value["body"].is_object());
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(&mock_server.uri(), HttpTransportOptions::default()).unwrap();
        let err = transport
            .get_json(CatalogEndpoint::ProfileIllusts, "/ajax/user/1/profile/illusts")
            .await
            .unwrap_err();
        match err {
            CatalogFetchError::Status { endpoint, status } => {
                assert_eq!(endpoint, CatalogEndpoint::ProfileIllusts);
                assert_eq!(status, 403);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&mock_server)
            .await;

        let transport = HttpTransport::new(&mock_server.uri(), HttpTransportOptions::default()).unwrap();
        let err = transport
            .get_json(CatalogEndpoint::ProfileAll, "/ajax/user/1/profile/all")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogFetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let options = HttpTransportOptions {
            timeout: Some(Duration::from_millis(50)),
            ..Default::default()
        };
        let transport = HttpTransport::new(&mock_server.uri(), options).unwrap();
        let err = transport
            .get_json(CatalogEndpoint::ProfileAll, "/ajax/user/1/profile/all")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogFetchError::Transport(_)));
    }
}
