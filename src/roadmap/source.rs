//! Where a roadmap comes from besides a fresh backend response: the locally
//! persisted copy and shareable links carrying the payload in a `data`
//! query parameter.

use reqwest::Url;
use serde_json::Value;

use super::model::Roadmap;
use crate::error::RoadmapError;
use crate::store::{KeyValueStore, load_json, storage_keys};

const DATA_PARAM: &str = "data";

/// The last roadmap persisted by onboarding or login. Missing, unreadable,
/// or unrecognized data is logged and reported as `None`.
pub async fn load_stored_roadmap(store: &dyn KeyValueStore) -> Option<Roadmap> {
    let payload: Value = match load_json(store, storage_keys::CAREER_PATH).await {
        Ok(Some(payload)) => payload,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Stored career path is unreadable");
            return None;
        }
    };
    match Roadmap::from_payload(&payload) {
        Ok(roadmap) => Some(roadmap),
        Err(e) => {
            tracing::warn!(error = %e, "Stored career path has an unusable shape");
            None
        }
    }
}

/// Decode a roadmap from a share link. `input` is either a full URL with a
/// `data` query parameter or the percent-encoded parameter value itself.
pub fn decode_shared_roadmap(input: &str) -> Result<Roadmap, RoadmapError> {
    let raw = shared_data(input)?;
    let payload: Value = serde_json::from_str(&raw)
        .map_err(|e| RoadmapError::Malformed(format!("shared data is not JSON: {e}")))?;
    Roadmap::from_payload(&payload)
}

/// Build a share link for `payload` under `base`.
pub fn encode_shared_roadmap(base: &str, payload: &Value) -> Result<Url, RoadmapError> {
    let mut url =
        Url::parse(base).map_err(|e| RoadmapError::Malformed(format!("bad base URL: {e}")))?;
    url.query_pairs_mut()
        .clear()
        .append_pair(DATA_PARAM, &payload.to_string());
    Ok(url)
}

fn shared_data(input: &str) -> Result<String, RoadmapError> {
    let input = input.trim();
    if let Ok(url) = Url::parse(input) {
        return data_param(&url)
            .ok_or_else(|| RoadmapError::Malformed("link has no data parameter".to_string()));
    }

    let value = input.strip_prefix("data=").unwrap_or(input);
    let mut url = Url::parse("http://localhost/")
        .map_err(|e| RoadmapError::Malformed(e.to_string()))?;
    url.set_query(Some(&format!("{DATA_PARAM}={value}")));
    data_param(&url).ok_or_else(|| RoadmapError::Malformed("empty data parameter".to_string()))
}

fn data_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == DATA_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn stored_roadmap_roundtrip_and_corruption() {
        let store = MemoryStore::new();
        assert!(load_stored_roadmap(&store).await.is_none());

        store
            .set(
                storage_keys::CAREER_PATH,
                r#"{"career_roadmap":{"stage_1":{"title":"Engineer"}}}"#,
            )
            .await
            .unwrap();
        let roadmap = load_stored_roadmap(&store).await.unwrap();
        assert_eq!(roadmap.stage(1).unwrap().header().title, "Engineer");

        store
            .set(storage_keys::CAREER_PATH, "{not json")
            .await
            .unwrap();
        assert!(load_stored_roadmap(&store).await.is_none());

        store
            .set(storage_keys::CAREER_PATH, r#"{"career_path":{"summary":"old"}}"#)
            .await
            .unwrap();
        assert!(load_stored_roadmap(&store).await.is_none());
    }

    #[test]
    fn decodes_percent_encoded_parameter() {
        let encoded = "%7B%22career_roadmap%22%3A%7B%22stage_5_launch%22%3A%7B%22title%22%3A%22Go%20live%22%7D%7D%7D";
        let roadmap = decode_shared_roadmap(encoded).unwrap();
        assert_eq!(roadmap.stage(5).unwrap().header().title, "Go live");

        let roadmap = decode_shared_roadmap(&format!("data={encoded}")).unwrap();
        assert_eq!(roadmap.stages.len(), 1);
    }

    #[test]
    fn share_link_roundtrip() {
        let payload = json!({"career_roadmap": {"stage_2_gap": {"title": "Gaps & more"}}});
        let url = encode_shared_roadmap("https://app.example/career-path", &payload).unwrap();
        assert_eq!(url.path(), "/career-path");

        let roadmap = decode_shared_roadmap(url.as_str()).unwrap();
        assert_eq!(roadmap.stage(2).unwrap().header().title, "Gaps & more");
    }

    #[test]
    fn bad_shared_data_is_malformed() {
        assert!(matches!(
            decode_shared_roadmap("https://app.example/career-path?other=1"),
            Err(RoadmapError::Malformed(_))
        ));
        assert!(matches!(
            decode_shared_roadmap("%7Bnope"),
            Err(RoadmapError::Malformed(_))
        ));
        assert!(matches!(
            decode_shared_roadmap("%7B%7D"),
            Err(RoadmapError::UnrecognizedShape)
        ));
    }
}
