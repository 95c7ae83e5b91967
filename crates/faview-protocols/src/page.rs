//! Host page protocol definitions.
//!
//! The host page is the browser tab showing the site. Faview reads its
//! location and headings and makes exactly two mutations, a heading text
//! suffix and one inserted list, applied together by
//! [`HostPage::annotate_section`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::BookmarkSummary;
use crate::error::PageError;

/// A heading element, addressed by its position among headings of its level.
///
/// Positions are only stable within a single tick; mutations re-check `text`
/// before touching the element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub index: usize,
    /// Trimmed text content.
    pub text: String,
    /// Already carries the faview annotation in this document.
    #[serde(default)]
    pub annotated: bool,
}

impl Heading {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            annotated: false,
        }
    }
}

/// One link of the inserted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkLink {
    pub href: String,
    pub title: String,
}

/// The list inserted after the catalog section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkList {
    pub links: Vec<BookmarkLink>,
    /// CSS color applied to every link.
    pub color: String,
}

impl BookmarkList {
    /// Build the list for `summary`, linking each work under `artwork_base_url`.
    pub fn from_summary(summary: &BookmarkSummary, artwork_base_url: &str, color: &str) -> Self {
        let base = artwork_base_url.trim_end_matches('/');
        let links = summary
            .works
            .iter()
            .map(|work| BookmarkLink {
                href: format!("{}/artworks/{}", base, work.id),
                title: work.title.clone(),
            })
            .collect();

        Self {
            links,
            color: color.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Core trait for host pages.
#[async_trait]
pub trait HostPage: Send + Sync {
    /// Current `location.href`.
    async fn location(&self) -> Result<String, PageError>;

    /// Identity of the loaded document.
    ///
    /// Stable across in-page (SPA) navigations, new after a full load.
    async fn document_id(&self) -> Result<String, PageError>;

    /// The document root's `lang` attribute, if any.
    async fn document_lang(&self) -> Result<Option<String>, PageError>;

    /// All headings of `level` (1 for `h1` ... 6 for `h6`), in document order.
    async fn headings(&self, level: u8) -> Result<Vec<Heading>, PageError>;

    /// Annotate the heading in one step: insert `list` as the next sibling of
    /// its ancestor `depth` levels up, append `suffix` to its text and mark it
    /// annotated.
    ///
    /// Either both mutations happen or neither does. Fails with
    /// [`PageError::HeadingGone`] when the heading at `heading.index` no longer
    /// has `heading.text`, and with [`PageError::SectionNotFound`] when the
    /// ancestor does not exist yet.
    async fn annotate_section(
        &self,
        level: u8,
        heading: &Heading,
        depth: usize,
        list: &BookmarkList,
        suffix: &str,
    ) -> Result<(), PageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BookmarkedWork, WorkId};

    #[test]
    fn test_list_from_summary() {
        let summary = BookmarkSummary {
            count: 2,
            works: vec![
                BookmarkedWork { id: WorkId(111), title: "Sunset".to_string() },
                BookmarkedWork { id: WorkId(222), title: "<b>bold</b>".to_string() },
            ],
        };
        let list = BookmarkList::from_summary(&summary, "https://www.pixiv.net/", "red");
        assert_eq!(list.len(), 2);
        assert_eq!(list.links[0].href, "https://www.pixiv.net/artworks/111");
        assert_eq!(list.links[1].title, "<b>bold</b>");
        assert_eq!(list.color, "red");
    }

    #[test]
    fn test_list_from_empty_summary() {
        let list = BookmarkList::from_summary(&BookmarkSummary::default(), "https://www.pixiv.net", "red");
        assert!(list.is_empty());
    }
}
