//! Chrome DevTools Protocol (CDP) client implementation.
//!
//! Connects to Chrome/Chromium via WebSocket and speaks the CDP JSON-RPC
//! protocol. Only the `Target`, `Page` and `Runtime` domains are used.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222", Duration::from_secs(30)).await?;
//! let tab = client.find_page("https://www.pixiv.net/").await?;
//! let page = client.attach_page(&tab.id).await?;
//! let href = page.evaluate("location.href").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
