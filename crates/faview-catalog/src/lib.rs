//! Artist catalog fetching for faview.
//!
//! [`PaginatedCatalogFetcher`] lists an artist's work ids, requests their
//! details in chunks of at most [`MAX_IDS_PER_REQUEST`], and merges the pages
//! into one [`Catalog`](faview_protocols::Catalog). Requests go through any
//! [`CatalogTransport`](faview_protocols::CatalogTransport); [`HttpTransport`]
//! is the reqwest-backed one.

mod fetcher;
mod http;
mod payload;

pub use fetcher::{MAX_IDS_PER_REQUEST, PaginatedCatalogFetcher, profile_all_query, profile_illusts_query};
pub use http::{HttpTransport, HttpTransportOptions};
