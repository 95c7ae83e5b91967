//! CDP wire messages.
//!
//! Only the fields faview reads are modelled; serde ignores the rest.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing command.
#[derive(Debug, Serialize)]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Incoming message: a command response (`id` set) or an event (`method` set).
#[derive(Debug, Deserialize)]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
}

/// A target from `/json/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: String,
    #[serde(default)]
    pub title: String,
    pub url: String,
}

/// `/json/version`. Chrome uses PascalCase keys here except for the socket URL.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// `exceptionDetails` of a failed `Runtime.evaluate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExceptionDetails {
    pub text: String,
    pub exception: Option<ThrownValue>,
}

impl ExceptionDetails {
    /// The thrown value's description, or the generic text ("Uncaught").
    pub fn message(&self) -> String {
        self.exception
            .as_ref()
            .and_then(|e| e.description.clone())
            .unwrap_or_else(|| self.text.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThrownValue {
    pub description: Option<String>,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
