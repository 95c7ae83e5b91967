//! Artist page recognition.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::catalog::ArtistId;

// Anchored at the path root; an optional locale segment (`/en`, `/zh-tw`) may precede `/users`.
static ARTIST_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:/[a-z]{2}(?:-[a-z]{2})?)?/users/(\d+)(/bookmarks)?(?:/|$)")
        .expect("artist path pattern is valid")
});

/// Where a navigation landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationClassification {
    NotArtistPage,
    ArtistPage { artist_id: ArtistId },
}

impl NavigationClassification {
    pub fn artist_id(&self) -> Option<&ArtistId> {
        match self {
            Self::ArtistPage { artist_id } => Some(artist_id),
            Self::NotArtistPage => None,
        }
    }
}

/// Classify a page URL.
///
/// `/users/<digits>` and its sub-routes are artist pages, except for the
/// `/users/<digits>/bookmarks` subtree, which lists the artist's own
/// bookmarks rather than their works. Query and fragment are ignored.
pub fn classify(url: &str) -> NavigationClassification {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    let Some(caps) = ARTIST_PATH.captures(&path) else {
        return NavigationClassification::NotArtistPage;
    };
    if caps.get(2).is_some() {
        return NavigationClassification::NotArtistPage;
    }

    match ArtistId::new(&caps[1]) {
        Some(artist_id) => NavigationClassification::ArtistPage { artist_id },
        None => NavigationClassification::NotArtistPage,
    }
}
