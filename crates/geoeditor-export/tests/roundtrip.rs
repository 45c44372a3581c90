use geoeditor_export::{export_category, export_dataset, import, to_json, upgrade};
use geoeditor_model::{Category, Dataset, Feature, MetaKey, ProjectId, Value};
use geoeditor_session::ProjectAction;

fn sample_dataset() -> Dataset {
    let rows = [
        [("age", Value::Number(31.0)), ("region", Value::Text("N".into()))],
        [("age", Value::Number(42.0)), ("region", Value::Text("S".into()))],
        [("age", Value::Null), ("region", Value::Text("N".into()))],
    ];
    let features: Vec<Feature> = rows
        .into_iter()
        .map(|row| {
            Feature::new(
                row.into_iter()
                    .map(|(name, value)| (name.to_string(), value))
                    .collect(),
            )
        })
        .collect();
    let mut dataset = Dataset::new("census", features);
    dataset.description = "tract demographics".to_string();
    dataset.field_model.select("age", true).unwrap();
    dataset.field_model.select("region", true).unwrap();
    dataset
        .field_model
        .set_meta("age", MetaKey::Meaning, "resident age")
        .unwrap();
    dataset
}

#[test]
fn dataset_record_round_trips() {
    let mut dataset = sample_dataset();
    dataset
        .field_model
        .attribute_weights_mut("region")
        .unwrap()
        .update("N", 70.0)
        .unwrap();

    let exported = export_dataset(&dataset, ProjectAction::Create);
    let bytes = to_json(&exported).unwrap();
    let imported = import(&bytes).unwrap();

    assert_eq!(imported.version, exported.version);
    assert_eq!(imported.project_type, exported.project_type);
    assert_eq!(imported.dataset_name, exported.dataset_name);
    assert_eq!(imported.description, exported.description);
    assert_eq!(imported.selected_fields, exported.selected_fields);
    assert_eq!(imported.field_types, exported.field_types);
    assert_eq!(imported.field_weights, exported.field_weights);
    assert_eq!(imported.field_meta, exported.field_meta);
    assert_eq!(imported.field_attributes, exported.field_attributes);
    assert_eq!(imported.statistics, exported.statistics);
    assert_eq!(imported.current_project, exported.current_project);

    // The attribute sub-fields survive byte-for-byte (scenario of record).
    let region = &imported.field_attributes["region"];
    assert_eq!(region.unique_values, vec!["N", "S"]);
    assert_eq!(region.value_counts["N"], 2);
    assert_eq!(region.value_counts["S"], 1);
    assert!((region.attribute_weights["N"] - 70.0).abs() < 1e-9);
    assert!((region.attribute_weights["S"] - 30.0).abs() < 1e-9);
}

#[test]
fn category_record_round_trips() {
    let mut category = Category::new("demographics");
    category.attach_dataset(ProjectId::generate("census"));
    category.attach_dataset(ProjectId::generate("roads"));

    let exported = export_category(&category, ProjectAction::Edit);
    let imported = import(&to_json(&exported).unwrap()).unwrap();

    let info = imported.category_info.unwrap();
    assert_eq!(info.dataset_ids.len(), 2);
    let total: f64 = info.dataset_weights.values().sum();
    assert!((total - 100.0).abs() < 1e-9);
    assert_eq!(info.class_name, "demographics");
}

#[test]
fn v1_records_upgrade_in_place() {
    let raw = r#"{
        "version": "1.0",
        "timestamp": "2023-11-05T08:30:00Z",
        "projectType": "dataset",
        "projectAction": "edit",
        "datasetName": "legacy",
        "description": "pre-attributes record",
        "selectedFields": ["score"],
        "fieldTypes": {"score": "quantitative"},
        "fieldWeights": {"score": 1.0},
        "fieldMeta": {"score": {"meaning": "", "importance": ""}}
    }"#;
    let record = import(raw).unwrap();
    assert!(record.field_attributes.is_empty());
    let upgraded = upgrade(record);
    assert_eq!(upgraded.version, "2.0");
    // Upgrading touches nothing but the version stamp.
    assert_eq!(upgraded.dataset_name, "legacy");
    assert_eq!(upgraded.field_weights["score"], 1.0);
}

#[test]
fn record_wire_shape_is_stable() {
    // The on-disk field names are a format contract; renames here break
    // every stored configuration.
    let dataset = sample_dataset();
    let record = export_dataset(&dataset, ProjectAction::Create);
    let json = serde_json::to_value(&record).unwrap();

    for key in [
        "version",
        "timestamp",
        "projectType",
        "projectAction",
        "datasetName",
        "description",
        "currentProject",
        "selectedFields",
        "fieldTypes",
        "fieldWeights",
        "fieldMeta",
        "fieldAttributes",
        "statistics",
        "dataInfo",
    ] {
        assert!(json.get(key).is_some(), "record lost key {key}");
    }
    assert_eq!(json["projectType"], "dataset");
    assert_eq!(json["projectAction"], "create");
    assert_eq!(json["fieldTypes"]["region"], "qualitative");

    let region = &json["fieldAttributes"]["region"];
    for key in ["uniqueValues", "valueCounts", "attributeWeights", "attributeMeta"] {
        assert!(region.get(key).is_some(), "attribute block lost key {key}");
    }
    assert_eq!(json["statistics"]["totalFeatures"], 3);
}
