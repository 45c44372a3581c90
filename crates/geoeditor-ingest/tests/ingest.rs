use std::io::Write;

use geoeditor_ingest::{ParseError, parse_feature_collection, read_csv_features_from_path};
use geoeditor_model::{FieldModel, FieldType};

#[test]
fn json_and_csv_paths_infer_the_same_types() {
    let json = r#"{"features":[
        {"properties":{"age":31,"region":"N"}},
        {"properties":{"age":42,"region":"S"}},
        {"properties":{"age":null,"region":"N"}}
    ]}"#;
    let json_features = parse_feature_collection(json).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "age,region\n31,N\n42,S\n,N\n").unwrap();
    let csv_features = read_csv_features_from_path(file.path()).unwrap();

    for features in [&json_features, &csv_features] {
        let model = FieldModel::ingest(features);
        assert_eq!(
            model.entry("age").unwrap().field_type,
            FieldType::Quantitative
        );
        assert_eq!(
            model.entry("region").unwrap().field_type,
            FieldType::Qualitative
        );
        let profile = model.attributes("region").unwrap();
        assert_eq!(profile.unique_values, vec!["N", "S"]);
        assert_eq!(profile.value_counts["N"], 2);
    }
}

#[test]
fn malformed_upload_leaves_no_partial_result() {
    let err = parse_feature_collection(r#"{"features":"nope"}"#).unwrap_err();
    assert!(matches!(err, ParseError::MissingFeatures));
}

#[test]
fn server_data_envelope_is_accepted() {
    // The fetch-data endpoint answers with `data` instead of `features`.
    let raw = r#"{"data":[{"properties":{"score":0.5}}]}"#;
    let features = parse_feature_collection(raw).unwrap();
    assert_eq!(features.len(), 1);
}
