use std::collections::BTreeMap;

use chrono::Utc;
use tracing::info;

use geoeditor_model::{
    Category, Dataset, FeatureLayer, FieldType, ProjectKind, WeightVector, field_samples,
};
use geoeditor_session::ProjectAction;

use crate::record::{
    CURRENT_VERSION, CategoryInfo, ConfigRecord, DataInfo, FeatureLayerInfo,
    FieldAttributesRecord, NumericSummary, Statistics, WeightCheck, WeightReport,
};

/// Human-readable class identifier: the project name with everything
/// non-alphanumeric stripped.
pub fn class_identifier(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Min/max/mean over numeric-coerced values, skipping values with no
/// numeric reading.
fn numeric_summary(dataset: &Dataset, field: &str) -> Option<NumericSummary> {
    let mut count = 0u64;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in field_samples(&dataset.raw_features, field) {
        let Some(number) = value.as_number() else {
            continue;
        };
        count += 1;
        sum += number;
        min = min.min(number);
        max = max.max(number);
    }
    (count > 0).then(|| NumericSummary {
        min,
        max,
        mean: sum / count as f64,
    })
}

fn dataset_statistics(dataset: &Dataset) -> Statistics {
    let mut quantitative = BTreeMap::new();
    let mut unique_value_counts = BTreeMap::new();
    for (field, entry) in &dataset.field_model.fields {
        match entry.field_type {
            FieldType::Quantitative => {
                if let Some(summary) = numeric_summary(dataset, field) {
                    quantitative.insert(field.clone(), summary);
                }
            }
            FieldType::Qualitative => {
                let distinct = entry
                    .attributes
                    .as_ref()
                    .map_or(0, |profile| profile.unique_values.len() as u64);
                unique_value_counts.insert(field.clone(), distinct);
            }
            FieldType::Boolean | FieldType::Unknown => {}
        }
    }
    Statistics {
        total_features: dataset.raw_features.len() as u64,
        quantitative,
        unique_value_counts,
    }
}

fn weight_check(scope: &str, vector: &WeightVector) -> WeightCheck {
    WeightCheck {
        scope: scope.to_string(),
        total: vector.total(),
        nominal: vector.scale(),
        band: vector.band(),
    }
}

fn dataset_weight_report(dataset: &Dataset) -> WeightReport {
    let mut checks = Vec::new();
    let model = &dataset.field_model;
    if !model.selected.is_empty() {
        let total = model.selected_weight_sum();
        checks.push(WeightCheck {
            scope: "fields".to_string(),
            total,
            nominal: 1.0,
            band: if (total - 1.0).abs() <= 0.05 {
                geoeditor_model::WeightBand::Green
            } else {
                geoeditor_model::WeightBand::Red
            },
        });
    }
    for field in &model.selected {
        if let Some(profile) = model.attributes(field)
            && !profile.weights.is_empty()
        {
            checks.push(weight_check(&format!("attributes:{field}"), &profile.weights));
        }
    }
    WeightReport { checks }
}

fn blank_to_missing(missing: &mut Vec<String>, part: &str, value: &str) {
    if value.trim().is_empty() {
        missing.push(part.to_string());
    }
}

/// Export a dataset project. Never fails on a partially filled project:
/// whatever is absent defaults to empty and is listed in `missing_parts`.
pub fn export_dataset(dataset: &Dataset, action: ProjectAction) -> ConfigRecord {
    let model = &dataset.field_model;
    let mut missing = Vec::new();
    blank_to_missing(&mut missing, "datasetName", &dataset.name);
    blank_to_missing(&mut missing, "description", &dataset.description);
    if model.selected.is_empty() {
        missing.push("selectedFields".to_string());
    }

    let selected_fields: Vec<String> = model.selected.iter().cloned().collect();
    let mut field_types = BTreeMap::new();
    let mut field_weights = BTreeMap::new();
    let mut field_meta = BTreeMap::new();
    let mut field_attributes = BTreeMap::new();
    for field in &selected_fields {
        let entry = &model.fields[field];
        field_types.insert(field.clone(), entry.field_type);
        field_weights.insert(field.clone(), entry.weight);
        field_meta.insert(field.clone(), entry.meta.clone());
        if let Some(profile) = &entry.attributes {
            field_attributes.insert(
                field.clone(),
                FieldAttributesRecord {
                    unique_values: profile.unique_values.clone(),
                    value_counts: profile.value_counts.clone(),
                    attribute_weights: profile.weights.entries().clone(),
                    attribute_meta: profile.meta.clone(),
                },
            );
        }
    }

    let record = ConfigRecord {
        version: CURRENT_VERSION.to_string(),
        timestamp: Utc::now(),
        project_type: ProjectKind::Dataset,
        project_action: action,
        dataset_name: dataset.name.clone(),
        description: dataset.description.clone(),
        current_project: serde_json::to_value(dataset).unwrap_or_default(),
        selected_fields,
        field_types,
        field_weights,
        field_meta,
        field_attributes,
        statistics: dataset_statistics(dataset),
        data_info: Some(DataInfo {
            class_name: class_identifier(&dataset.name),
            feature_count: dataset.raw_features.len() as u64,
            field_count: model.fields.len() as u64,
        }),
        category_info: None,
        feature_layer_info: None,
        missing_parts: missing,
        weight_report: Some(dataset_weight_report(dataset)),
    };
    info!(project = %dataset.id, "dataset configuration exported");
    record
}

/// Export a category project.
pub fn export_category(category: &Category, action: ProjectAction) -> ConfigRecord {
    let mut missing = Vec::new();
    blank_to_missing(&mut missing, "datasetName", &category.name);
    blank_to_missing(&mut missing, "description", &category.description);
    if category.dataset_ids.is_empty() {
        missing.push("datasetIds".to_string());
    }

    ConfigRecord {
        version: CURRENT_VERSION.to_string(),
        timestamp: Utc::now(),
        project_type: ProjectKind::Category,
        project_action: action,
        dataset_name: category.name.clone(),
        description: category.description.clone(),
        current_project: serde_json::to_value(category).unwrap_or_default(),
        selected_fields: Vec::new(),
        field_types: BTreeMap::new(),
        field_weights: BTreeMap::new(),
        field_meta: BTreeMap::new(),
        field_attributes: BTreeMap::new(),
        statistics: Statistics::default(),
        data_info: None,
        category_info: Some(CategoryInfo {
            class_name: class_identifier(&category.name),
            dataset_ids: category
                .dataset_ids
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
            dataset_weights: category.dataset_weights.entries().clone(),
        }),
        feature_layer_info: None,
        missing_parts: missing,
        weight_report: Some(WeightReport {
            checks: vec![weight_check("members", &category.dataset_weights)],
        }),
    }
}

/// Export a feature layer project.
pub fn export_feature_layer(layer: &FeatureLayer, action: ProjectAction) -> ConfigRecord {
    let mut missing = Vec::new();
    blank_to_missing(&mut missing, "datasetName", &layer.name);
    blank_to_missing(&mut missing, "description", &layer.description);
    if layer.category_ids.is_empty() {
        missing.push("categoryIds".to_string());
    }

    ConfigRecord {
        version: CURRENT_VERSION.to_string(),
        timestamp: Utc::now(),
        project_type: ProjectKind::FeatureLayer,
        project_action: action,
        dataset_name: layer.name.clone(),
        description: layer.description.clone(),
        current_project: serde_json::to_value(layer).unwrap_or_default(),
        selected_fields: Vec::new(),
        field_types: BTreeMap::new(),
        field_weights: BTreeMap::new(),
        field_meta: BTreeMap::new(),
        field_attributes: BTreeMap::new(),
        statistics: Statistics::default(),
        data_info: None,
        category_info: None,
        feature_layer_info: Some(FeatureLayerInfo {
            class_name: class_identifier(&layer.name),
            category_ids: layer
                .category_ids
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
            category_weights: layer.category_weights.entries().clone(),
        }),
        missing_parts: missing,
        weight_report: Some(WeightReport {
            checks: vec![weight_check("members", &layer.category_weights)],
        }),
    }
}
