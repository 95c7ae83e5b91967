//! Catalog protocol definitions.
//!
//! A catalog is the full set of an artist's works, keyed by work id, together
//! with the viewer's bookmark status for each.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CatalogFetchError;
use crate::lang::Lang;

/// Artist (user) identifier, a run of ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(String);

impl ArtistId {
    /// Create an artist id. Returns `None` unless `raw` is non-empty digits.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(raw))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Work (artwork) identifier.
///
/// Ordered numerically, which is also the order the bookmark list is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkId(pub u64);

impl FromStr for WorkId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(WorkId)
    }
}

impl fmt::Display for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One work as reported by the details endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRecord {
    pub id: WorkId,
    pub title: String,
    pub is_bookmarked: bool,
}

/// Aggregated catalog of one artist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    works: BTreeMap<WorkId, WorkRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. A record with the same id is replaced.
    pub fn insert(&mut self, record: WorkRecord) {
        self.works.insert(record.id, record);
    }

    /// Merge another page of records into this catalog, last write wins.
    pub fn merge(&mut self, other: Catalog) {
        self.works.extend(other.works);
    }

    pub fn len(&self) -> usize {
        self.works.len()
    }

    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }

    pub fn get(&self, id: WorkId) -> Option<&WorkRecord> {
        self.works.get(&id)
    }

    /// Records in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkRecord> {
        self.works.values()
    }

    /// Reduce the catalog to what the page annotation needs.
    pub fn bookmark_summary(&self) -> BookmarkSummary {
        let works: Vec<BookmarkedWork> = self
            .iter()
            .filter(|w| w.is_bookmarked)
            .map(|w| BookmarkedWork {
                id: w.id,
                title: w.title.clone(),
            })
            .collect();

        BookmarkSummary {
            count: works.len(),
            works,
        }
    }
}

impl FromIterator<WorkRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = WorkRecord>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for record in iter {
            catalog.insert(record);
        }
        catalog
    }
}

/// A bookmarked work, as listed on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkedWork {
    pub id: WorkId,
    pub title: String,
}

/// Bookmark count plus the ordered list of bookmarked works.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkSummary {
    pub count: usize,
    pub works: Vec<BookmarkedWork>,
}

/// Core trait for catalog sources.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the complete catalog of `artist`.
    ///
    /// Either every page succeeds or the whole fetch fails; partial
    /// catalogs are never returned.
    async fn fetch_catalog(&self, artist: &ArtistId, lang: Lang) -> Result<Catalog, CatalogFetchError>;
}
