//! In-memory host page.
//!
//! Models just enough of a document for the annotation flow: a location, the
//! root `lang` attribute, a flat list of headings (each with the number of
//! ancestors it has) and the lists inserted after sections. Used for dry runs
//! and tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::PageError;
use crate::page::{BookmarkList, Heading, HostPage};

/// Ancestor count given to headings added with [`MemoryPage::add_heading`].
pub const DEFAULT_NESTING: usize = 3;

#[derive(Debug, Clone)]
struct MemoryHeading {
    level: u8,
    text: String,
    nesting: usize,
    annotated: bool,
}

/// A list inserted after a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedList {
    /// Text of the anchoring heading at insertion time.
    pub heading_text: String,
    pub depth: usize,
    pub list: BookmarkList,
}

#[derive(Debug, Default)]
struct MemoryState {
    location: String,
    lang: Option<String>,
    /// Bumped by every full load.
    generation: u64,
    headings: Vec<MemoryHeading>,
    inserted: Vec<InsertedList>,
    detached: bool,
}

/// A [`HostPage`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<MemoryState>,
}

impl MemoryPage {
    pub fn new(location: impl Into<String>, lang: Option<&str>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                location: location.into(),
                lang: lang.map(str::to_string),
                ..Default::default()
            }),
        }
    }

    /// SPA navigation: change the location and drop the rendered content.
    /// The document stays the same.
    pub fn navigate(&self, location: impl Into<String>) {
        let mut state = self.state.lock();
        state.location = location.into();
        state.headings.clear();
        state.inserted.clear();
    }

    /// Full load of `location`: a new document with no content yet.
    pub fn load(&self, location: impl Into<String>) {
        let mut state = self.state.lock();
        state.location = location.into();
        state.generation += 1;
        state.headings.clear();
        state.inserted.clear();
    }

    /// Full reload of the current location.
    pub fn reload(&self) {
        let location = self.state.lock().location.clone();
        self.load(location);
    }

    /// Change the location without re-rendering (e.g. a query string update).
    pub fn set_location(&self, location: impl Into<String>) {
        self.state.lock().location = location.into();
    }

    pub fn set_lang(&self, lang: Option<&str>) {
        self.state.lock().lang = lang.map(str::to_string);
    }

    pub fn add_heading(&self, level: u8, text: impl Into<String>) {
        self.add_nested_heading(level, text, DEFAULT_NESTING);
    }

    pub fn add_nested_heading(&self, level: u8, text: impl Into<String>, nesting: usize) {
        self.state.lock().headings.push(MemoryHeading {
            level,
            text: text.into(),
            nesting,
            annotated: false,
        });
    }

    /// Re-render: drop all headings of `level` and render `texts` in their place.
    pub fn replace_headings(&self, level: u8, texts: &[&str]) {
        let mut state = self.state.lock();
        state.headings.retain(|h| h.level != level);
        for text in texts {
            state.headings.push(MemoryHeading {
                level,
                text: text.to_string(),
                nesting: DEFAULT_NESTING,
                annotated: false,
            });
        }
    }

    /// Make every call fail as if the tab went away.
    pub fn set_detached(&self, detached: bool) {
        self.state.lock().detached = detached;
    }

    pub fn heading_texts(&self, level: u8) -> Vec<String> {
        self.state
            .lock()
            .headings
            .iter()
            .filter(|h| h.level == level)
            .map(|h| h.text.clone())
            .collect()
    }

    pub fn inserted_lists(&self) -> Vec<InsertedList> {
        self.state.lock().inserted.clone()
    }

    fn check_attached(state: &MemoryState) -> Result<(), PageError> {
        if state.detached {
            Err(PageError::Detached("memory page detached".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl HostPage for MemoryPage {
    async fn location(&self) -> Result<String, PageError> {
        let state = self.state.lock();
        Self::check_attached(&state)?;
        Ok(state.location.clone())
    }

    async fn document_id(&self) -> Result<String, PageError> {
        let state = self.state.lock();
        Self::check_attached(&state)?;
        Ok(format!("memory-{}", state.generation))
    }

    async fn document_lang(&self) -> Result<Option<String>, PageError> {
        let state = self.state.lock();
        Self::check_attached(&state)?;
        Ok(state.lang.clone())
    }

    async fn headings(&self, level: u8) -> Result<Vec<Heading>, PageError> {
        let state = self.state.lock();
        Self::check_attached(&state)?;
        Ok(state
            .headings
            .iter()
            .filter(|h| h.level == level)
            .enumerate()
            .map(|(index, h)| Heading {
                index,
                text: h.text.trim().to_string(),
                annotated: h.annotated,
            })
            .collect())
    }

    async fn annotate_section(
        &self,
        level: u8,
        heading: &Heading,
        depth: usize,
        list: &BookmarkList,
        suffix: &str,
    ) -> Result<(), PageError> {
        let mut state = self.state.lock();
        Self::check_attached(&state)?;
        let target = state
            .headings
            .iter_mut()
            .filter(|h| h.level == level)
            .nth(heading.index)
            .filter(|h| h.text.trim() == heading.text)
            .ok_or(PageError::HeadingGone(heading.index))?;
        if depth == 0 || depth > target.nesting {
            return Err(PageError::SectionNotFound {
                index: heading.index,
                depth,
            });
        }

        let heading_text = target.text.clone();
        target.text.push_str(suffix);
        target.annotated = true;
        state.inserted.push(InsertedList {
            heading_text,
            depth,
            list: list.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_headings_filtered_by_level() {
        let page = MemoryPage::new("https://www.pixiv.net/", Some("en"));
        page.add_heading(1, "Title");
        page.add_heading(2, "Profile");
        page.add_heading(2, " Works\n");

        let h2 = page.headings(2).await.unwrap();
        assert_eq!(h2.len(), 2);
        assert_eq!(h2[1], Heading::new(1, "Works"));
    }

    #[tokio::test]
    async fn test_annotate_section() {
        let page = MemoryPage::new("https://www.pixiv.net/users/1", Some("en"));
        page.add_heading(2, "Works");
        let heading = page.headings(2).await.unwrap().remove(0);

        page.annotate_section(2, &heading, 3, &BookmarkList::default(), "(Bookmarks: 0)")
            .await
            .unwrap();

        assert_eq!(page.heading_texts(2), vec!["Works(Bookmarks: 0)".to_string()]);
        assert!(page.headings(2).await.unwrap()[0].annotated);
        let inserted = page.inserted_lists();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].heading_text, "Works");
        assert!(inserted[0].list.is_empty());
    }

    #[tokio::test]
    async fn test_annotate_too_deep_changes_nothing() {
        let page = MemoryPage::new("/", None);
        page.add_nested_heading(2, "Works", 1);
        let heading = page.headings(2).await.unwrap().remove(0);
        let err = page
            .annotate_section(2, &heading, 3, &BookmarkList::default(), "(x)")
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::SectionNotFound { depth: 3, .. }));
        assert_eq!(page.heading_texts(2), vec!["Works"]);
        assert!(page.inserted_lists().is_empty());
    }

    #[tokio::test]
    async fn test_annotate_rechecks_heading_text() {
        let page = MemoryPage::new("/users/1", Some("en"));
        page.add_heading(2, "Works");
        let heading = page.headings(2).await.unwrap().remove(0);

        page.replace_headings(2, &["Profile", "Works"]);
        let err = page
            .annotate_section(2, &heading, 3, &BookmarkList::default(), "(x)")
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::HeadingGone(0)));
        assert_eq!(page.heading_texts(2), vec!["Profile", "Works"]);
        assert!(page.inserted_lists().is_empty());
    }

    #[tokio::test]
    async fn test_navigate_keeps_document() {
        let page = MemoryPage::new("/users/1", Some("ja"));
        page.add_heading(2, "作品");
        let before = page.document_id().await.unwrap();

        page.navigate("/users/2");
        assert_eq!(page.location().await.unwrap(), "/users/2");
        assert!(page.headings(2).await.unwrap().is_empty());
        assert_eq!(page.document_id().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_reload_replaces_document() {
        let page = MemoryPage::new("/users/1", Some("en"));
        page.add_heading(2, "Works");
        let before = page.document_id().await.unwrap();

        page.reload();
        assert_eq!(page.location().await.unwrap(), "/users/1");
        assert!(page.headings(2).await.unwrap().is_empty());
        assert_ne!(page.document_id().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_detached() {
        let page = MemoryPage::new("/", Some("en"));
        page.set_detached(true);
        assert!(matches!(page.location().await, Err(PageError::Detached(_))));
        assert!(matches!(page.document_id().await, Err(PageError::Detached(_))));
    }

    #[tokio::test]
    async fn test_heading_gone() {
        let page = MemoryPage::new("/", Some("en"));
        let ghost = Heading::new(4, "Works");
        let err = page
            .annotate_section(2, &ghost, 3, &BookmarkList::default(), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, PageError::HeadingGone(4)));
    }
}
