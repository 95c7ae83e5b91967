//! # Faview Protocols
//!
//! Domain types and seams shared by the faview crates. Holds no I/O of
//! its own apart from the in-memory [`MemoryPage`].
//!
//! ## Core Traits
//!
//! - [`CatalogSource`] - Produces an artist's aggregated work catalog
//! - [`CatalogTransport`] - Issues one JSON request against the catalog API
//! - [`HostPage`] - The browser tab being annotated
//!
//! ## Pure Helpers
//!
//! - [`Localizer`] - Display strings for the page's active language
//! - [`navigation::classify`] - Recognizes artist pages from a URL

pub mod catalog;
pub mod error;
pub mod lang;
pub mod memory;
pub mod navigation;
pub mod page;
pub mod transport;

pub use catalog::{ArtistId, BookmarkSummary, BookmarkedWork, Catalog, CatalogSource, WorkId, WorkRecord};
pub use error::{CatalogFetchError, InitializationError, PageError};
pub use lang::{Lang, Localizer, Phrase};
pub use memory::MemoryPage;
pub use navigation::{NavigationClassification, classify};
pub use page::{BookmarkLink, BookmarkList, Heading, HostPage};
pub use transport::{CatalogEndpoint, CatalogTransport};
