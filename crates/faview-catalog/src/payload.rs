//! Wire payloads of the catalog API.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use faview_protocols::CatalogFetchError;

/// Common response envelope: `{ "error": bool, "message": string, "body": ... }`.
///
/// On errors the API sends `"body": []`, so the body is decoded only after
/// the error flag has been checked.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub body: Value,
}

impl Envelope {
    /// Decode the body, turning an API-level error into a fetch error.
    pub fn into_body<T: DeserializeOwned>(self) -> Result<T, CatalogFetchError> {
        if self.error {
            return Err(CatalogFetchError::Api(self.message));
        }
        if self.body.is_null() {
            return Err(CatalogFetchError::Decode("response has no body".to_string()));
        }
        Ok(serde_json::from_value(self.body)?)
    }
}

/// Body of `/profile/all`. Only the id keys of the two maps matter.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileAllBody {
    #[serde(default, deserialize_with = "map_keys")]
    pub illusts: Vec<String>,
    #[serde(default, deserialize_with = "map_keys")]
    pub manga: Vec<String>,
}

/// Body of `/profile/illusts`.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileIllustsBody {
    #[serde(default, deserialize_with = "map_or_empty")]
    pub works: BTreeMap<String, WorkPayload>,
}

/// Per-work detail entry.
#[derive(Debug, Deserialize)]
pub(crate) struct WorkPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "bookmarkData")]
    pub bookmark_data: Option<Value>,
}

impl WorkPayload {
    /// Bookmarked when the bookmark metadata is present and not empty.
    pub fn is_bookmarked(&self) -> bool {
        match &self.bookmark_data {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        }
    }
}

// The API sends `[]` instead of `{}` for empty maps.
fn map_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Object(map) => map.into_iter().map(|(k, _)| k).collect(),
        _ => Vec::new(),
    })
}

fn map_or_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, WorkPayload>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(BTreeMap::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_all_keys() {
        let envelope: Envelope = serde_json::from_value(json!({
            "error": false,
            "message": "",
            "body": {
                "illusts": {"1": null, "2": null},
                "manga": {"3": null},
                "novels": {"9": null}
            }
        }))
        .unwrap();
        let body: ProfileAllBody = envelope.into_body().unwrap();
        assert_eq!(body.illusts.len(), 2);
        assert_eq!(body.manga, vec!["3".to_string()]);
    }

    #[test]
    fn test_empty_array_means_empty_map() {
        let body: ProfileAllBody = serde_json::from_value(json!({
            "illusts": [],
            "manga": []
        }))
        .unwrap();
        assert!(body.illusts.is_empty());
        assert!(body.manga.is_empty());

        let body: ProfileIllustsBody = serde_json::from_value(json!({"works": []})).unwrap();
        assert!(body.works.is_empty());
    }

    #[test]
    fn test_missing_maps_default_empty() {
        let body: ProfileAllBody = serde_json::from_value(json!({})).unwrap();
        assert!(body.illusts.is_empty());
    }

    #[test]
    fn test_api_error_envelope() {
        let envelope: Envelope = serde_json::from_value(json!({
            "error": true,
            "message": "User not found",
            "body": []
        }))
        .unwrap();
        let err = envelope.into_body::<ProfileAllBody>().unwrap_err();
        assert!(matches!(err, CatalogFetchError::Api(m) if m == "User not found"));
    }

    #[test]
    fn test_missing_body() {
        let envelope: Envelope = serde_json::from_value(json!({"error": false})).unwrap();
        assert!(matches!(
            envelope.into_body::<ProfileAllBody>(),
            Err(CatalogFetchError::Decode(_))
        ));
    }

    #[test]
    fn test_bookmark_detection() {
        let works: ProfileIllustsBody = serde_json::from_value(json!({
            "works": {
                "111": {"title": "a", "bookmarkData": {"id": "9", "private": false}},
                "112": {"title": "b", "bookmarkData": null},
                "113": {"title": "c"},
                "114": {"title": "d", "bookmarkData": {}}
            }
        }))
        .unwrap();
        assert!(works.works["111"].is_bookmarked());
        assert!(!works.works["112"].is_bookmarked());
        assert!(!works.works["113"].is_bookmarked());
        assert!(!works.works["114"].is_bookmarked());
    }
}
