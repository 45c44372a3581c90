#![deny(unsafe_code)]

pub mod exporter;
pub mod import;
pub mod record;

pub use exporter::{class_identifier, export_category, export_dataset, export_feature_layer};
pub use import::{ExportError, Result, import, to_json, upgrade};
pub use record::{
    CURRENT_VERSION, CategoryInfo, ConfigRecord, DataInfo, FeatureLayerInfo,
    FieldAttributesRecord, NumericSummary, OLDEST_SUPPORTED_VERSION, Statistics, WeightCheck,
    WeightReport,
};
