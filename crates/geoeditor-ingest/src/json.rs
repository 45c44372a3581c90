use std::collections::BTreeMap;

use serde_json::Value as Json;
use tracing::debug;

use geoeditor_model::{Feature, Value};

use crate::error::{ParseError, Result};

/// Parse a feature collection document.
///
/// Accepts the duck shapes the server and user uploads produce: an object
/// with a `features` array (optionally `total_features`), or a bare array of
/// features. Each feature carries its fields under `properties` or
/// `attributes`; geometry passes through untouched. A malformed document is
/// rejected whole so the caller's prior field model stays intact.
pub fn parse_feature_collection(raw: &str) -> Result<Vec<Feature>> {
    let document: Json = serde_json::from_str(raw)?;
    let items = match &document {
        Json::Array(items) => items.as_slice(),
        Json::Object(map) => map
            .get("features")
            .or_else(|| map.get("data"))
            .and_then(Json::as_array)
            .map(Vec::as_slice)
            .ok_or(ParseError::MissingFeatures)?,
        _ => return Err(ParseError::MissingFeatures),
    };

    let mut features = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        features.push(normalize_feature(index, item)?);
    }
    debug!(count = features.len(), "feature collection parsed");
    Ok(features)
}

fn normalize_feature(index: usize, raw: &Json) -> Result<Feature> {
    let object = raw
        .as_object()
        .ok_or(ParseError::MissingProperties { index })?;
    let properties = object
        .get("properties")
        .or_else(|| object.get("attributes"))
        .and_then(Json::as_object)
        .ok_or(ParseError::MissingProperties { index })?;

    let mut normalized: BTreeMap<String, Value> = BTreeMap::new();
    for (name, value) in properties {
        normalized.insert(name.clone(), Value::from(value.clone()));
    }

    Ok(Feature {
        properties: normalized,
        geometry: object.get("geometry").cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoeditor_model::FieldType;

    #[test]
    fn parses_properties_shape() {
        let raw = r#"{"features":[{"properties":{"age":31,"region":"N"},"geometry":{"type":"Point"}}],"total_features":1}"#;
        let features = parse_feature_collection(raw).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].value("age"), Some(&Value::Number(31.0)));
        assert!(features[0].geometry.is_some());
    }

    #[test]
    fn parses_attributes_shape() {
        let raw = r#"[{"attributes":{"name":"site-a"}}]"#;
        let features = parse_feature_collection(raw).unwrap();
        assert_eq!(
            features[0].value("name"),
            Some(&Value::Text("site-a".into()))
        );
    }

    #[test]
    fn rejects_feature_without_properties() {
        let raw = r#"{"features":[{"geometry":{}}]}"#;
        assert!(matches!(
            parse_feature_collection(raw),
            Err(ParseError::MissingProperties { index: 0 })
        ));
    }

    #[test]
    fn rejects_non_collection_document() {
        assert!(matches!(
            parse_feature_collection("42"),
            Err(ParseError::MissingFeatures)
        ));
        assert!(parse_feature_collection("{not json").is_err());
    }

    #[test]
    fn parsed_values_classify_as_expected() {
        let raw = r#"{"features":[{"properties":{"flag":true,"tags":["a","b"]}}]}"#;
        let features = parse_feature_collection(raw).unwrap();
        assert_eq!(
            geoeditor_model::classify(features[0].value("flag").unwrap()),
            FieldType::Boolean
        );
        assert_eq!(
            geoeditor_model::classify(features[0].value("tags").unwrap()),
            FieldType::Qualitative
        );
    }
}
