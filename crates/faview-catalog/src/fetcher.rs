//! Paginated catalog fetcher.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::form_urlencoded;

use faview_protocols::{
    ArtistId, Catalog, CatalogEndpoint, CatalogFetchError, CatalogSource, CatalogTransport, Lang,
    WorkId, WorkRecord,
};

use crate::payload::{Envelope, ProfileAllBody, ProfileIllustsBody};

/// Largest id list the details endpoint accepts in one request.
pub const MAX_IDS_PER_REQUEST: usize = 100;

/// Path and query for the work id listing of `artist`.
pub fn profile_all_query(artist: &ArtistId, lang: Lang) -> String {
    let qs = form_urlencoded::Serializer::new(String::new())
        .append_pair("lang", lang.code())
        .finish();
    format!("{}?{}", CatalogEndpoint::ProfileAll.path(artist.as_str()), qs)
}

/// Path and query for the details of `ids`.
pub fn profile_illusts_query(artist: &ArtistId, lang: Lang, ids: &[WorkId]) -> String {
    let mut qs = form_urlencoded::Serializer::new(String::new());
    qs.append_pair("work_category", "illust")
        .append_pair("is_first_page", "1")
        .append_pair("lang", lang.code());
    for id in ids {
        qs.append_pair("ids[]", &id.to_string());
    }
    format!(
        "{}?{}",
        CatalogEndpoint::ProfileIllusts.path(artist.as_str()),
        qs.finish()
    )
}

/// Fetches an artist's whole catalog, chunking the detail requests.
pub struct PaginatedCatalogFetcher {
    transport: Arc<dyn CatalogTransport>,
}

impl PaginatedCatalogFetcher {
    pub fn new(transport: Arc<dyn CatalogTransport>) -> Self {
        Self { transport }
    }

    /// Union of the artist's illustration and manga ids.
    async fn work_ids(&self, artist: &ArtistId, lang: Lang) -> Result<BTreeSet<WorkId>, CatalogFetchError> {
        let value = self
            .transport
            .get_json(CatalogEndpoint::ProfileAll, &profile_all_query(artist, lang))
            .await?;
        let envelope: Envelope = serde_json::from_value(value)?;
        let body: ProfileAllBody = envelope.into_body()?;

        let mut ids = BTreeSet::new();
        for key in body.illusts.iter().chain(body.manga.iter()) {
            match key.parse::<WorkId>() {
                Ok(id) => {
                    ids.insert(id);
                }
                Err(_) => warn!("Ignoring non-numeric work id {:?} of artist {}", key, artist),
            }
        }
        Ok(ids)
    }

    /// Details of one chunk of ids.
    async fn work_details(
        &self,
        artist: &ArtistId,
        lang: Lang,
        chunk: &[WorkId],
    ) -> Result<Catalog, CatalogFetchError> {
        let value = self
            .transport
            .get_json(
                CatalogEndpoint::ProfileIllusts,
                &profile_illusts_query(artist, lang, chunk),
            )
            .await?;
        let envelope: Envelope = serde_json::from_value(value)?;
        let body: ProfileIllustsBody = envelope.into_body()?;

        let mut page = Catalog::new();
        for (key, work) in body.works {
            let Ok(id) = key.parse::<WorkId>() else {
                warn!("Ignoring non-numeric work id {:?} in details of artist {}", key, artist);
                continue;
            };
            let is_bookmarked = work.is_bookmarked();
            page.insert(WorkRecord {
                id,
                title: work.title,
                is_bookmarked,
            });
        }
        Ok(page)
    }
}

#[async_trait]
impl CatalogSource for PaginatedCatalogFetcher {
    async fn fetch_catalog(&self, artist: &ArtistId, lang: Lang) -> Result<Catalog, CatalogFetchError> {
        let ids: Vec<WorkId> = self.work_ids(artist, lang).await?.into_iter().collect();
        let chunks = ids.len().div_ceil(MAX_IDS_PER_REQUEST);
        debug!(
            "Artist {} has {} works, fetching details in {} chunk(s) via {}",
            artist,
            ids.len(),
            chunks,
            self.transport.name()
        );

        let mut catalog = Catalog::new();
        for (n, chunk) in ids.chunks(MAX_IDS_PER_REQUEST).enumerate() {
            let page = self.work_details(artist, lang, chunk).await?;
            debug!("Chunk {}/{}: {} records", n + 1, chunks, page.len());
            catalog.merge(page);
        }

        info!(
            "Fetched catalog of artist {}: {} works, {} bookmarked",
            artist,
            catalog.len(),
            catalog.iter().filter(|w| w.is_bookmarked).count()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
