//! The polling orchestrator.
//!
//! One tick per interval: drain finished catalog fetches, observe the page
//! location, then annotate once the catalog for the current artist is known.
//! Fetches run as spawned tasks and report back over a channel, so a slow
//! request never holds up the tick.
//!
//! A full page load replaces the document and everything in it. When the
//! page reports a new document the session starts over and the locale is
//! read again.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use faview_protocols::{
    ArtistId, Catalog, CatalogFetchError, CatalogSource, HostPage, InitializationError, Localizer,
};

use crate::annotator::PageAnnotator;
use crate::config::OrchestratorConfig;
use crate::session::{CompletionOutcome, NavigationOutcome, OrchestratorState, Session};

/// A finished catalog fetch, tagged with the artist it was requested for.
#[derive(Debug)]
pub struct FetchCompletion {
    /// Document generation the fetch was started in.
    pub epoch: u64,
    pub artist_id: ArtistId,
    pub result: Result<Catalog, CatalogFetchError>,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The current page is not an artist page.
    NotArtistPage,
    /// On an artist page whose catalog is not available.
    AwaitingCatalog,
    /// Catalog ready, catalog section not rendered yet.
    SectionNotReady,
    /// Annotated this tick with `count` bookmarks.
    Annotated { count: usize },
    /// Already annotated in this navigation epoch.
    AlreadyAnnotated,
    /// The host page could not be read or written.
    PageUnavailable,
}

pub struct PollingOrchestrator {
    page: Arc<dyn HostPage>,
    catalog: Arc<dyn CatalogSource>,
    config: OrchestratorConfig,
    localizer: Localizer,
    annotator: PageAnnotator,
    session: Session,
    document_id: String,
    /// Incremented whenever the document is replaced.
    epoch: u64,
    completions_tx: mpsc::UnboundedSender<FetchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<FetchCompletion>,
}

impl PollingOrchestrator {
    /// Read the page locale and build the orchestrator.
    ///
    /// Fails when the document root has no usable `lang` attribute.
    pub async fn start(
        page: Arc<dyn HostPage>,
        catalog: Arc<dyn CatalogSource>,
        config: OrchestratorConfig,
    ) -> Result<Self, InitializationError> {
        let document_id = page
            .document_id()
            .await
            .map_err(|e| InitializationError::HostUnavailable(e.to_string()))?;
        let lang = page
            .document_lang()
            .await
            .map_err(|e| InitializationError::HostUnavailable(e.to_string()))?;
        let localizer = Localizer::from_attribute(lang.as_deref())?;
        info!("Page locale: {}", localizer.lang());

        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Ok(Self {
            page,
            catalog,
            annotator: PageAnnotator::new(&config),
            config,
            localizer,
            session: Session::new(),
            document_id,
            epoch: 0,
            completions_tx,
            completions_rx,
        })
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> OrchestratorState {
        self.session.state()
    }

    /// Run one polling cycle.
    pub async fn tick(&mut self) -> TickOutcome {
        self.drain_completions();

        match self.page.document_id().await {
            Ok(id) if id != self.document_id => self.enter_document(id).await,
            Ok(_) => {}
            Err(e) => {
                warn!("Cannot read page document: {}", e);
                return TickOutcome::PageUnavailable;
            }
        }

        let url = match self.page.location().await {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot read page location: {}", e);
                return TickOutcome::PageUnavailable;
            }
        };

        match self.session.navigate(&url) {
            NavigationOutcome::Unchanged => {}
            NavigationOutcome::LeftArtistPage => {
                debug!("Navigated to {} (not an artist page)", url);
                return TickOutcome::NotArtistPage;
            }
            NavigationOutcome::NewArtist(artist_id) => {
                info!("Navigated to artist {}, fetching catalog", artist_id);
                self.spawn_fetch(artist_id);
            }
            NavigationOutcome::SameArtist => {
                debug!("Navigated to {} (same artist)", url);
            }
        }

        if !self.session.is_artist_page() {
            return match self.session.state() {
                OrchestratorState::Navigated => TickOutcome::AwaitingCatalog,
                _ => TickOutcome::NotArtistPage,
            };
        }
        if self.session.insertion_done() {
            return TickOutcome::AlreadyAnnotated;
        }
        let Some(summary) = self.session.bookmarks() else {
            return TickOutcome::AwaitingCatalog;
        };

        match self
            .annotator
            .try_annotate(self.page.as_ref(), &self.localizer, summary)
            .await
        {
            Ok(true) => {
                let count = summary.count;
                self.session.mark_annotated();
                info!("Annotated {} with {} bookmarks", url, count);
                TickOutcome::Annotated { count }
            }
            Ok(false) => {
                trace!("Catalog section not rendered yet");
                TickOutcome::SectionNotReady
            }
            Err(e) => {
                warn!("Annotation failed: {}", e);
                TickOutcome::PageUnavailable
            }
        }
    }

    /// Tick every interval until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.config.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("Polling started (interval={}ms)", self.config.interval_ms);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let outcome = self.tick().await;
                    trace!("Tick: {:?}", outcome);
                }
            }
        }

        info!("Polling stopped");
    }

    /// The page was fully loaded again: start over as on a fresh page.
    async fn enter_document(&mut self, id: String) {
        info!("Page reloaded, starting over");
        self.document_id = id;
        self.epoch += 1;
        self.session = Session::new();

        match self.page.document_lang().await {
            Ok(lang) => match Localizer::from_attribute(lang.as_deref()) {
                Ok(localizer) => {
                    if localizer.lang() != self.localizer.lang() {
                        info!("Page locale changed to {}", localizer.lang());
                    }
                    self.localizer = localizer;
                }
                Err(e) => warn!("Keeping locale {}: {}", self.localizer.lang(), e),
            },
            Err(e) => warn!("Keeping locale {}: {}", self.localizer.lang(), e),
        }
    }

    fn spawn_fetch(&self, artist_id: ArtistId) {
        let catalog = self.catalog.clone();
        let tx = self.completions_tx.clone();
        let lang = self.localizer.lang();
        let epoch = self.epoch;

        tokio::spawn(async move {
            let result = catalog.fetch_catalog(&artist_id, lang).await;
            // Receiver gone means the orchestrator was dropped.
            let _ = tx.send(FetchCompletion { epoch, artist_id, result });
        });
    }

    fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply_completion(completion);
        }
    }

    fn apply_completion(&mut self, completion: FetchCompletion) {
        let FetchCompletion { epoch, artist_id, result } = completion;
        if epoch != self.epoch {
            debug!("Dropping catalog for artist {} from a replaced document", artist_id);
            return;
        }
        let outcome = match result {
            Ok(catalog) => {
                let summary = catalog.bookmark_summary();
                debug!(
                    "Catalog for artist {}: {} works, {} bookmarked",
                    artist_id,
                    catalog.len(),
                    summary.count
                );
                self.session.complete_fetch(&artist_id, summary)
            }
            Err(e) => {
                let outcome = self.session.fail_fetch(&artist_id);
                if outcome == CompletionOutcome::Failed {
                    warn!("Catalog fetch for artist {} failed: {}", artist_id, e);
                }
                outcome
            }
        };

        if outcome == CompletionOutcome::Stale {
            debug!("Dropping stale catalog for artist {}", artist_id);
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
