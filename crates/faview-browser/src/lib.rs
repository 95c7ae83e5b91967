//! Browser host page for faview.
//!
//! Drives the viewer's own browser tab over the Chrome DevTools Protocol
//! (CDP); nothing is installed into the browser itself.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  faview         │ ◄──────────────► │   Chrome/Edge    │
//! │  (this crate)   │       CDP        │  (pixiv tab)     │
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! ## Setup
//!
//! Start Chrome with remote debugging enabled and log in to pixiv:
//!
//! ```bash
//! google-chrome --remote-debugging-port=9222
//! ```
//!
//! [`CdpHostPage`] reads the tab's location and headings and performs the
//! annotation; [`PageFetchTransport`] issues catalog requests with `fetch()`
//! from inside the tab, so the viewer's session decides what is bookmarked.

pub mod cdp;
mod host;
mod scripts;
mod transport;

pub use cdp::{CdpClient, CdpError, PageInfo, PageSession};
pub use host::CdpHostPage;
pub use transport::PageFetchTransport;
