use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use geoeditor_model::{FieldType, Meta, ProjectKind, WeightBand};
use geoeditor_session::ProjectAction;

/// Record schema version this build writes.
pub const CURRENT_VERSION: &str = "2.0";
/// Oldest version `import` still accepts; v1.0 predates `fieldAttributes`.
pub const OLDEST_SUPPORTED_VERSION: &str = "1.0";

/// Per-field attribute block of the persisted record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAttributesRecord {
    #[serde(default)]
    pub unique_values: Vec<String>,
    #[serde(default)]
    pub value_counts: BTreeMap<String, u64>,
    #[serde(default)]
    pub attribute_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub attribute_meta: BTreeMap<String, Meta>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Derived summary written alongside the configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_features: u64,
    /// Per quantitative field, min/max/mean over numeric-coerced values
    /// (NaN readings skipped).
    #[serde(default)]
    pub quantitative: BTreeMap<String, NumericSummary>,
    /// Per qualitative field, how many distinct values were observed.
    #[serde(default)]
    pub unique_value_counts: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataInfo {
    pub class_name: String,
    pub feature_count: u64,
    pub field_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub class_name: String,
    pub dataset_ids: Vec<String>,
    pub dataset_weights: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureLayerInfo {
    pub class_name: String,
    pub category_ids: Vec<String>,
    pub category_weights: BTreeMap<String, f64>,
}

/// One weight vector's health at export time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightCheck {
    /// What the vector weighs, e.g. `fields`, `attributes:region`,
    /// `members`.
    pub scope: String,
    pub total: f64,
    pub nominal: f64,
    pub band: WeightBand,
}

/// Totals of every weight vector in the exported entity. The single-sum
/// invariant is asserted here, at export time, not continuously.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightReport {
    pub checks: Vec<WeightCheck>,
}

impl WeightReport {
    pub fn all_green(&self) -> bool {
        self.checks
            .iter()
            .all(|check| check.band == WeightBand::Green)
    }
}

/// The persisted configuration record (schema v2.0).
///
/// Field names are fixed by the on-disk format and stable across minor
/// versions. A v1.0 record lacks `fieldAttributes`; `serde(default)` covers
/// it and `upgrade` stamps the current version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub project_type: ProjectKind,
    pub project_action: ProjectAction,
    #[serde(default)]
    pub dataset_name: String,
    #[serde(default)]
    pub description: String,
    /// The project as stored, carried opaquely for reimport.
    #[serde(default)]
    pub current_project: Json,
    #[serde(default)]
    pub selected_fields: Vec<String>,
    #[serde(default)]
    pub field_types: BTreeMap<String, FieldType>,
    /// Fractions in [0, 1].
    #[serde(default)]
    pub field_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub field_meta: BTreeMap<String, Meta>,
    #[serde(default)]
    pub field_attributes: BTreeMap<String, FieldAttributesRecord>,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_info: Option<DataInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_info: Option<CategoryInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_layer_info: Option<FeatureLayerInfo>,
    /// Which required parts were absent when the record was produced.
    /// Export never fails on a partial project; it advertises the gaps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_parts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_report: Option<WeightReport>,
}
