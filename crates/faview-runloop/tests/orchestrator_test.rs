//! End-to-end tests for the polling orchestrator.
//!
//! These drive the full machine over an in-memory page: navigation, catalog
//! completion, annotation and the epoch rules in between.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use faview_protocols::{
    ArtistId, BookmarkList, Catalog, CatalogFetchError, CatalogSource, Heading, HostPage, Lang, MemoryPage,
    PageError, WorkId, WorkRecord,
};
use faview_runloop::{OrchestratorConfig, OrchestratorState, PollingOrchestrator, TickOutcome};

// ============================================================================
// Test Helpers
// ============================================================================

fn catalog(bookmarked: &[u64], others: &[u64]) -> Catalog {
    bookmarked
        .iter()
        .map(|&id| (id, true))
        .chain(others.iter().map(|&id| (id, false)))
        .map(|(id, is_bookmarked)| WorkRecord {
            id: WorkId(id),
            title: format!("work {}", id),
            is_bookmarked,
        })
        .collect()
}

/// Catalog source whose fetches stay pending until the test releases them.
#[derive(Default)]
struct GatedCatalog {
    gates: Mutex<HashMap<String, oneshot::Receiver<Catalog>>>,
    calls: AtomicUsize,
}

impl GatedCatalog {
    /// Arm a gate for `artist`; sending on the returned sender completes the fetch.
    fn gate(&self, artist: &str) -> oneshot::Sender<Catalog> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(artist.to_string(), rx);
        tx
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for GatedCatalog {
    async fn fetch_catalog(&self, artist: &ArtistId, _lang: Lang) -> Result<Catalog, CatalogFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().remove(artist.as_str());
        match gate {
            Some(rx) => rx
                .await
                .map_err(|_| CatalogFetchError::Transport("gate dropped".to_string())),
            None => Err(CatalogFetchError::Transport(format!("no gate for {}", artist))),
        }
    }
}

/// Let spawned fetch tasks run to completion.
async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
}

/// What [`DisruptedPage`] does on the first annotation call.
#[derive(Clone, Copy)]
enum Disruption {
    /// Apply the annotation, then report the call as timed out.
    LoseReply,
    /// Re-render the headings just before the annotation lands.
    Rerender,
}

/// A memory page whose first annotation call is disrupted.
struct DisruptedPage {
    inner: Arc<MemoryPage>,
    disruption: Disruption,
    armed: AtomicBool,
}

impl DisruptedPage {
    fn new(inner: Arc<MemoryPage>, disruption: Disruption) -> Self {
        Self {
            inner,
            disruption,
            armed: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl HostPage for DisruptedPage {
    async fn location(&self) -> Result<String, PageError> {
        self.inner.location().await
    }

    async fn document_id(&self) -> Result<String, PageError> {
        self.inner.document_id().await
    }

    async fn document_lang(&self) -> Result<Option<String>, PageError> {
        self.inner.document_lang().await
    }

    async fn headings(&self, level: u8) -> Result<Vec<Heading>, PageError> {
        self.inner.headings(level).await
    }

    async fn annotate_section(
        &self,
        level: u8,
        heading: &Heading,
        depth: usize,
        list: &BookmarkList,
        suffix: &str,
    ) -> Result<(), PageError> {
        if !self.armed.swap(false, Ordering::SeqCst) {
            return self.inner.annotate_section(level, heading, depth, list, suffix).await;
        }
        match self.disruption {
            Disruption::LoseReply => {
                self.inner.annotate_section(level, heading, depth, list, suffix).await?;
                Err(PageError::Detached("Timeout: Request Runtime.evaluate timed out".to_string()))
            }
            Disruption::Rerender => {
                self.inner.replace_headings(level, &["Profile", "Works"]);
                self.inner.annotate_section(level, heading, depth, list, suffix).await
            }
        }
    }
}

async fn orchestrator(page: &Arc<MemoryPage>, catalog: &Arc<GatedCatalog>) -> PollingOrchestrator {
    PollingOrchestrator::start(page.clone(), catalog.clone(), OrchestratorConfig::default())
        .await
        .unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_end_to_end_english_artist_page() {
    let page = Arc::new(MemoryPage::new("https://www.pixiv.net/users/12345", Some("en")));
    page.add_heading(2, "Works");
    let source = Arc::new(GatedCatalog::default());
    let gate = source.gate("12345");
    let mut orchestrator = orchestrator(&page, &source).await;

    assert_eq!(orchestrator.tick().await, TickOutcome::AwaitingCatalog);
    assert_eq!(orchestrator.state(), OrchestratorState::Navigated);
    // In-flight fetch: nothing is written yet.
    assert_eq!(orchestrator.tick().await, TickOutcome::AwaitingCatalog);
    assert!(page.inserted_lists().is_empty());

    gate.send(catalog(&[111], &[112, 113])).unwrap();
    settle().await;

    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 1 });
    assert_eq!(page.heading_texts(2), vec!["Works(Bookmarks: 1)"]);

    let inserted = page.inserted_lists();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].list.len(), 1);
    assert!(inserted[0].list.links[0].href.ends_with("/artworks/111"));
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_zero_works_inserts_empty_list() {
    let page = Arc::new(MemoryPage::new("https://www.pixiv.net/users/1", Some("en")));
    page.add_heading(2, "Works");
    let source = Arc::new(GatedCatalog::default());
    let gate = source.gate("1");
    let mut orchestrator = orchestrator(&page, &source).await;

    orchestrator.tick().await;
    gate.send(Catalog::new()).unwrap();
    settle().await;

    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 0 });
    assert_eq!(page.heading_texts(2), vec!["Works(Bookmarks: 0)"]);
    let inserted = page.inserted_lists();
    assert_eq!(inserted.len(), 1);
    assert!(inserted[0].list.is_empty());
}

#[tokio::test]
async fn test_annotation_is_idempotent_within_epoch() {
    let page = Arc::new(MemoryPage::new("https://www.pixiv.net/users/1", Some("ja")));
    page.add_heading(2, "イラスト・マンガ");
    let source = Arc::new(GatedCatalog::default());
    let gate = source.gate("1");
    let mut orchestrator = orchestrator(&page, &source).await;

    orchestrator.tick().await;
    gate.send(catalog(&[5, 6], &[])).unwrap();
    settle().await;

    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 2 });
    assert_eq!(orchestrator.tick().await, TickOutcome::AlreadyAnnotated);
    assert_eq!(orchestrator.tick().await, TickOutcome::AlreadyAnnotated);

    assert_eq!(page.heading_texts(2), vec!["イラスト・マンガ(ブックマーク: 2)"]);
    assert_eq!(page.inserted_lists().len(), 1);
    assert_eq!(orchestrator.state(), OrchestratorState::Annotated);
}

#[tokio::test]
async fn test_stale_fetch_does_not_populate_new_artist() {
    let page = Arc::new(MemoryPage::new("https://www.pixiv.net/users/100", Some("en")));
    page.add_heading(2, "Works");
    let source = Arc::new(GatedCatalog::default());
    let gate_a = source.gate("100");
    let gate_b = source.gate("200");
    let mut orchestrator = orchestrator(&page, &source).await;

    assert_eq!(orchestrator.tick().await, TickOutcome::AwaitingCatalog);

    page.navigate("https://www.pixiv.net/users/200");
    page.add_heading(2, "Works");
    assert_eq!(orchestrator.tick().await, TickOutcome::AwaitingCatalog);
    settle().await;
    assert_eq!(source.calls(), 2);

    // A resolves late, after the viewer moved on to B.
    gate_a.send(catalog(&[111], &[])).unwrap();
    settle().await;
    assert_eq!(orchestrator.tick().await, TickOutcome::AwaitingCatalog);
    assert!(orchestrator.session().bookmarks().is_none());
    assert!(page.inserted_lists().is_empty());
    assert_eq!(page.heading_texts(2), vec!["Works"]);

    gate_b.send(catalog(&[222, 223], &[224])).unwrap();
    settle().await;
    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 2 });

    let inserted = page.inserted_lists();
    assert_eq!(inserted.len(), 1);
    let hrefs: Vec<&str> = inserted[0].list.links.iter().map(|l| l.href.as_str()).collect();
    assert_eq!(
        hrefs,
        vec!["https://www.pixiv.net/artworks/222", "https://www.pixiv.net/artworks/223"]
    );
}

#[tokio::test]
async fn test_same_artist_route_reuses_catalog() {
    let page = Arc::new(MemoryPage::new("https://www.pixiv.net/users/1", Some("en")));
    page.add_heading(2, "Works");
    let source = Arc::new(GatedCatalog::default());
    let gate = source.gate("1");
    let mut orchestrator = orchestrator(&page, &source).await;

    orchestrator.tick().await;
    gate.send(catalog(&[9], &[8])).unwrap();
    settle().await;
    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 1 });

    // SPA route change: content re-renders, a new epoch begins.
    page.navigate("https://www.pixiv.net/users/1/illustrations");
    assert_eq!(orchestrator.tick().await, TickOutcome::SectionNotReady);
    page.add_heading(2, "Illustrations and Manga");
    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 1 });

    assert_eq!(page.heading_texts(2), vec!["Illustrations and Manga(Bookmarks: 1)"]);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_bookmarks_route_is_ignored() {
    let page = Arc::new(MemoryPage::new(
        "https://www.pixiv.net/users/12345/bookmarks/artworks",
        Some("en"),
    ));
    page.add_heading(2, "Works");
    let source = Arc::new(GatedCatalog::default());
    let mut orchestrator = orchestrator(&page, &source).await;

    assert_eq!(orchestrator.tick().await, TickOutcome::NotArtistPage);
    assert_eq!(orchestrator.tick().await, TickOutcome::NotArtistPage);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
    assert_eq!(source.calls(), 0);
    assert_eq!(page.heading_texts(2), vec!["Works"]);
}

#[tokio::test]
async fn test_back_to_artist_after_leaving() {
    let page = Arc::new(MemoryPage::new("https://www.pixiv.net/users/1", Some("en")));
    let source = Arc::new(GatedCatalog::default());
    let gate = source.gate("1");
    let mut orchestrator = orchestrator(&page, &source).await;

    orchestrator.tick().await;
    page.navigate("https://www.pixiv.net/artworks/9");
    assert_eq!(orchestrator.tick().await, TickOutcome::NotArtistPage);

    // Catalog lands while the viewer is elsewhere.
    gate.send(catalog(&[9], &[])).unwrap();
    settle().await;
    assert_eq!(orchestrator.tick().await, TickOutcome::NotArtistPage);

    page.navigate("https://www.pixiv.net/users/1");
    page.add_heading(2, "Works");
    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 1 });
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_reload_same_url_annotates_again() {
    let page = Arc::new(MemoryPage::new("https://www.pixiv.net/users/1", Some("en")));
    page.add_heading(2, "Works");
    let source = Arc::new(GatedCatalog::default());
    let gate = source.gate("1");
    let mut orchestrator = orchestrator(&page, &source).await;

    orchestrator.tick().await;
    gate.send(catalog(&[9], &[8])).unwrap();
    settle().await;
    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 1 });

    // Full reload: same URL, fresh document without the annotation.
    let gate = source.gate("1");
    page.reload();
    page.add_heading(2, "Works");
    assert_eq!(orchestrator.tick().await, TickOutcome::AwaitingCatalog);
    assert_eq!(orchestrator.state(), OrchestratorState::Navigated);

    gate.send(catalog(&[9, 10], &[8])).unwrap();
    settle().await;
    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 2 });
    assert_eq!(orchestrator.tick().await, TickOutcome::AlreadyAnnotated);

    assert_eq!(page.heading_texts(2), vec!["Works(Bookmarks: 2)"]);
    assert_eq!(page.inserted_lists().len(), 1);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_reload_rereads_locale() {
    let page = Arc::new(MemoryPage::new("https://www.pixiv.net/users/1", Some("en")));
    let source = Arc::new(GatedCatalog::default());
    let gate = source.gate("1");
    let mut orchestrator = orchestrator(&page, &source).await;
    assert_eq!(orchestrator.localizer().lang(), Lang::En);

    page.set_lang(Some("ja"));
    page.reload();
    page.add_heading(2, "作品");
    orchestrator.tick().await;
    assert_eq!(orchestrator.localizer().lang(), Lang::Ja);

    gate.send(catalog(&[3], &[])).unwrap();
    settle().await;
    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 1 });
    assert_eq!(page.heading_texts(2), vec!["作品(ブックマーク: 1)"]);
}

#[tokio::test]
async fn test_late_catalog_from_replaced_document_is_dropped() {
    let page = Arc::new(MemoryPage::new("https://www.pixiv.net/users/1", Some("en")));
    page.add_heading(2, "Works");
    let source = Arc::new(GatedCatalog::default());
    let old_gate = source.gate("1");
    let mut orchestrator = orchestrator(&page, &source).await;

    orchestrator.tick().await;
    settle().await;

    let new_gate = source.gate("1");
    page.reload();
    page.add_heading(2, "Works");
    assert_eq!(orchestrator.tick().await, TickOutcome::AwaitingCatalog);
    settle().await;
    assert_eq!(source.calls(), 2);

    old_gate.send(catalog(&[1], &[])).unwrap();
    settle().await;
    assert_eq!(orchestrator.tick().await, TickOutcome::AwaitingCatalog);
    assert!(page.inserted_lists().is_empty());

    new_gate.send(catalog(&[1, 2], &[])).unwrap();
    settle().await;
    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 2 });
}

#[tokio::test]
async fn test_lost_reply_does_not_annotate_twice() {
    let memory = Arc::new(MemoryPage::new("https://www.pixiv.net/users/1", Some("en")));
    memory.add_heading(2, "Works");
    let page = Arc::new(DisruptedPage::new(memory.clone(), Disruption::LoseReply));
    let source = Arc::new(GatedCatalog::default());
    let gate = source.gate("1");
    let mut orchestrator = PollingOrchestrator::start(page, source.clone(), OrchestratorConfig::default())
        .await
        .unwrap();

    orchestrator.tick().await;
    gate.send(catalog(&[111], &[112])).unwrap();
    settle().await;

    assert_eq!(orchestrator.tick().await, TickOutcome::PageUnavailable);
    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 1 });
    assert_eq!(orchestrator.tick().await, TickOutcome::AlreadyAnnotated);

    assert_eq!(memory.heading_texts(2), vec!["Works(Bookmarks: 1)"]);
    assert_eq!(memory.inserted_lists().len(), 1);
}

#[tokio::test]
async fn test_rerender_before_annotation_retargets_heading() {
    let memory = Arc::new(MemoryPage::new("https://www.pixiv.net/users/1", Some("en")));
    memory.add_heading(2, "Works");
    let page = Arc::new(DisruptedPage::new(memory.clone(), Disruption::Rerender));
    let source = Arc::new(GatedCatalog::default());
    let gate = source.gate("1");
    let mut orchestrator = PollingOrchestrator::start(page, source.clone(), OrchestratorConfig::default())
        .await
        .unwrap();

    orchestrator.tick().await;
    gate.send(catalog(&[111], &[])).unwrap();
    settle().await;

    // Heading 0 became "Profile" under the annotation: nothing is written.
    assert_eq!(orchestrator.tick().await, TickOutcome::SectionNotReady);
    assert_eq!(memory.heading_texts(2), vec!["Profile", "Works"]);
    assert!(memory.inserted_lists().is_empty());

    assert_eq!(orchestrator.tick().await, TickOutcome::Annotated { count: 1 });
    assert_eq!(memory.heading_texts(2), vec!["Profile", "Works(Bookmarks: 1)"]);
    assert_eq!(memory.inserted_lists().len(), 1);
}
