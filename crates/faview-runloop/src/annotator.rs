//! Page annotation: count suffix on the catalog heading plus the bookmark list.

use tracing::debug;

use faview_protocols::{BookmarkList, BookmarkSummary, HostPage, Localizer, PageError};

use crate::config::OrchestratorConfig;

pub struct PageAnnotator {
    heading_level: u8,
    section_depth: usize,
    link_color: String,
    artwork_base_url: String,
}

impl PageAnnotator {
    pub fn new(config: &OrchestratorConfig) -> Self {
        Self {
            heading_level: config.heading_level,
            section_depth: config.section_depth,
            link_color: config.link_color.clone(),
            artwork_base_url: config.artwork_base_url.clone(),
        }
    }

    /// Annotate the first heading titled like the catalog section.
    ///
    /// Returns `Ok(false)` while the section has not rendered yet, including
    /// when it re-renders between the lookup and the mutation; the page is
    /// left unchanged in that case. A heading that already carries the
    /// annotation counts as done, so a call whose reply was lost is never
    /// applied twice.
    pub async fn try_annotate(
        &self,
        page: &dyn HostPage,
        localizer: &Localizer,
        summary: &BookmarkSummary,
    ) -> Result<bool, PageError> {
        let headings = page.headings(self.heading_level).await?;
        if headings.iter().any(|h| h.annotated) {
            debug!("Section already annotated in this document");
            return Ok(true);
        }

        let titles = localizer.section_titles();
        let found = headings
            .into_iter()
            .find(|h| titles.iter().any(|title| *title == h.text.trim()));
        let Some(heading) = found else {
            return Ok(false);
        };

        let list = BookmarkList::from_summary(summary, &self.artwork_base_url, &self.link_color);
        let suffix = localizer.count_suffix(summary.count);
        match page
            .annotate_section(self.heading_level, &heading, self.section_depth, &list, &suffix)
            .await
        {
            Ok(()) => Ok(true),
            Err(e @ (PageError::SectionNotFound { .. } | PageError::HeadingGone(_))) => {
                debug!("Section not ready: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
