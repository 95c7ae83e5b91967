//! # Faview RunLoop
//!
//! Navigation-aware polling loop. The host page is a single-page application
//! that changes routes without reloading, so the loop polls its location on
//! a fixed interval instead of waiting for load events.
//!
//! ## Lifecycle
//!
//! ```text
//!   Idle ──(artist URL)──► Navigated ──(catalog fetched)──► CatalogReady
//!    ▲                         ▲                                 │
//!    │                         └──────(another artist)───────────┤
//!    └──────────(non-artist URL)─────────────────────────────────┤
//!                                                    (section found)
//!                                                                ▼
//!                                                            Annotated
//! ```
//!
//! Every URL change starts a new navigation epoch and re-arms annotation.
//! A full page load (a new document) resets the session to `Idle` and
//! re-reads the page locale.
//!
//! ## Key Components
//!
//! - [`PollingOrchestrator`]: owns the [`Session`] and drives each tick
//! - [`PageAnnotator`]: heading suffix and bookmark list insertion
//! - [`OrchestratorConfig`]: interval and annotation settings

pub mod annotator;
pub mod config;
pub mod orchestrator;
pub mod session;

pub use annotator::PageAnnotator;
pub use config::OrchestratorConfig;
pub use orchestrator::{FetchCompletion, PollingOrchestrator, TickOutcome};
pub use session::{CompletionOutcome, NavigationOutcome, OrchestratorState, Session};
