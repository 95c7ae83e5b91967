//! Per-page session state.
//!
//! Owned by the orchestrator and mutated only from its tick. Fetch results
//! arrive tagged with the artist they were requested for and are applied
//! only while that artist is still current.

use faview_protocols::{ArtistId, BookmarkSummary, NavigationClassification, classify};

/// Where the orchestrator stands for the current navigation epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    /// Not on an artist page (or nothing observed yet).
    Idle,
    /// On an artist page, catalog not available.
    Navigated,
    /// Catalog available, annotation pending.
    CatalogReady,
    /// Annotation done for this epoch.
    Annotated,
}

/// Result of observing the page location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Same URL as the previous tick.
    Unchanged,
    /// Landed on a page that is not an artist page.
    LeftArtistPage,
    /// Landed on a different artist; a catalog fetch must be started.
    NewArtist(ArtistId),
    /// Another route of the current artist.
    SameArtist,
}

/// Result of applying a fetch completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Applied,
    Failed,
    /// Requested for an artist that is no longer current.
    Stale,
}

#[derive(Debug, Default)]
pub struct Session {
    current_url: Option<String>,
    current_artist_id: Option<ArtistId>,
    /// Current URL is a route of `current_artist_id`.
    on_artist_route: bool,
    /// On an artist page with its catalog available.
    is_artist_page: bool,
    insertion_done: bool,
    /// Valid for `current_artist_id` only.
    bookmarks: Option<BookmarkSummary>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn current_artist_id(&self) -> Option<&ArtistId> {
        self.current_artist_id.as_ref()
    }

    pub fn is_artist_page(&self) -> bool {
        self.is_artist_page
    }

    pub fn insertion_done(&self) -> bool {
        self.insertion_done
    }

    pub fn bookmarks(&self) -> Option<&BookmarkSummary> {
        self.bookmarks.as_ref()
    }

    pub fn state(&self) -> OrchestratorState {
        match (self.is_artist_page, self.insertion_done, self.on_artist_route) {
            (true, true, _) => OrchestratorState::Annotated,
            (true, false, _) => OrchestratorState::CatalogReady,
            (false, _, true) => OrchestratorState::Navigated,
            (false, _, false) => OrchestratorState::Idle,
        }
    }

    /// Record the page location. Any URL change opens a new navigation epoch.
    pub fn navigate(&mut self, url: &str) -> NavigationOutcome {
        if self.current_url.as_deref() == Some(url) {
            return NavigationOutcome::Unchanged;
        }
        self.current_url = Some(url.to_string());
        self.insertion_done = false;

        let artist_id = match classify(url) {
            NavigationClassification::NotArtistPage => {
                self.on_artist_route = false;
                self.is_artist_page = false;
                return NavigationOutcome::LeftArtistPage;
            }
            NavigationClassification::ArtistPage { artist_id } => artist_id,
        };

        self.on_artist_route = true;
        if self.current_artist_id.as_ref() == Some(&artist_id) {
            // Catalog may still be in flight; its completion marks the page ready.
            self.is_artist_page = self.bookmarks.is_some();
            return NavigationOutcome::SameArtist;
        }

        self.current_artist_id = Some(artist_id.clone());
        self.bookmarks = None;
        self.is_artist_page = false;
        NavigationOutcome::NewArtist(artist_id)
    }

    /// Apply the catalog fetched for `artist_id`.
    pub fn complete_fetch(&mut self, artist_id: &ArtistId, summary: BookmarkSummary) -> CompletionOutcome {
        if self.current_artist_id.as_ref() != Some(artist_id) {
            return CompletionOutcome::Stale;
        }
        self.bookmarks = Some(summary);
        self.is_artist_page = self.on_artist_route;
        CompletionOutcome::Applied
    }

    /// Record a failed fetch for `artist_id`.
    ///
    /// The artist is forgotten, so the next navigation to any of its routes
    /// fetches again; staying on the same URL does not.
    pub fn fail_fetch(&mut self, artist_id: &ArtistId) -> CompletionOutcome {
        if self.current_artist_id.as_ref() != Some(artist_id) {
            return CompletionOutcome::Stale;
        }
        self.current_artist_id = None;
        self.bookmarks = None;
        self.is_artist_page = false;
        CompletionOutcome::Failed
    }

    pub fn mark_annotated(&mut self) {
        self.insertion_done = true;
    }
}
