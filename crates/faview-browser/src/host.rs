//! HostPage over a CDP page session.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use faview_protocols::{BookmarkList, Heading, HostPage, PageError};

use crate::cdp::PageSession;
use crate::scripts;

/// The viewer's pixiv tab, driven through `Runtime.evaluate`.
pub struct CdpHostPage {
    session: Arc<PageSession>,
}

impl CdpHostPage {
    pub fn new(session: Arc<PageSession>) -> Self {
        Self { session }
    }

    async fn eval(&self, expression: &str) -> Result<Value, PageError> {
        trace!("evaluate on {}: {} bytes", self.session.target_id(), expression.len());
        Ok(self.session.evaluate(expression).await?)
    }
}

#[async_trait]
impl HostPage for CdpHostPage {
    async fn location(&self) -> Result<String, PageError> {
        match self.eval(scripts::LOCATION).await? {
            Value::String(href) => Ok(href),
            other => Err(PageError::Script(format!("location.href was {}", other))),
        }
    }

    async fn document_id(&self) -> Result<String, PageError> {
        match self.eval(scripts::DOCUMENT_ID).await? {
            Value::String(id) => Ok(id),
            other => Err(PageError::Script(format!("document tag was {}", other))),
        }
    }

    async fn document_lang(&self) -> Result<Option<String>, PageError> {
        match self.eval(scripts::DOCUMENT_LANG).await? {
            Value::String(lang) => Ok(Some(lang)),
            _ => Ok(None),
        }
    }

    async fn headings(&self, level: u8) -> Result<Vec<Heading>, PageError> {
        let value = self.eval(&scripts::heading_texts(level)).await?;
        let found: Vec<RenderedHeading> = serde_json::from_value(value)
            .map_err(|e| PageError::Script(format!("unexpected heading list: {}", e)))?;
        Ok(found
            .into_iter()
            .enumerate()
            .map(|(index, h)| Heading {
                index,
                text: h.text,
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
        let script = scripts::annotate_section(level, heading.index, &heading.text, depth, list, suffix);
        let value = self.eval(&script).await?;
        annotate_result(&value, heading.index, depth)
    }
}

#[derive(Deserialize)]
struct RenderedHeading {
    text: String,
    #[serde(default)]
    annotated: bool,
}

fn annotate_result(value: &Value, index: usize, depth: usize) -> Result<(), PageError> {
    match value.as_str() {
        Some(scripts::ANNOTATE_OK) => Ok(()),
        Some(scripts::ANNOTATE_HEADING_GONE) => Err(PageError::HeadingGone(index)),
        Some(scripts::ANNOTATE_NO_SECTION) => Err(PageError::SectionNotFound { index, depth }),
        _ => Err(PageError::Script(format!("unexpected annotate result: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_annotate_result_markers() {
        assert!(annotate_result(&json!("ok"), 0, 3).is_ok());
        assert!(matches!(
            annotate_result(&json!("heading-gone"), 2, 3),
            Err(PageError::HeadingGone(2))
        ));
        assert!(matches!(
            annotate_result(&json!("no-section"), 0, 4),
            Err(PageError::SectionNotFound { index: 0, depth: 4 })
        ));
        assert!(matches!(annotate_result(&Value::Null, 0, 3), Err(PageError::Script(_))));
    }

    #[test]
    fn test_rendered_heading_shape() {
        let found: Vec<RenderedHeading> =
            serde_json::from_value(json!([{"text": "Works", "annotated": true}, {"text": "Profile"}])).unwrap();
        assert!(found[0].annotated);
        assert!(!found[1].annotated);
        assert_eq!(found[1].text, "Profile");
    }
}
