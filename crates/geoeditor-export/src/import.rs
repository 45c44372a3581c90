use thiserror::Error;
use tracing::debug;

use crate::record::{CURRENT_VERSION, ConfigRecord, OLDEST_SUPPORTED_VERSION};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("configuration record is not well-formed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported record version: {0}")]
    UnsupportedVersion(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

pub fn to_json(record: &ConfigRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Load a configuration record. v1.0 records predate `fieldAttributes` and
/// load with that block empty; anything newer than the current schema is
/// rejected rather than silently misread.
pub fn import(raw: &str) -> Result<ConfigRecord> {
    let record: ConfigRecord = serde_json::from_str(raw)?;
    match record.version.as_str() {
        CURRENT_VERSION | OLDEST_SUPPORTED_VERSION => {
            debug!(version = %record.version, "configuration record imported");
            Ok(record)
        }
        other => Err(ExportError::UnsupportedVersion(other.to_string())),
    }
}

/// Stamp an accepted record to the current schema version. Defaults filled
/// in during import (an empty `fieldAttributes` for v1.0) are kept as-is.
pub fn upgrade(mut record: ConfigRecord) -> ConfigRecord {
    if record.version != CURRENT_VERSION {
        record.version = CURRENT_VERSION.to_string();
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_v1() -> String {
        r#"{
            "version": "1.0",
            "timestamp": "2024-03-01T12:00:00Z",
            "projectType": "dataset",
            "projectAction": "create",
            "datasetName": "census",
            "description": "",
            "selectedFields": ["age"],
            "fieldTypes": {"age": "quantitative"},
            "fieldWeights": {"age": 1.0},
            "fieldMeta": {"age": {"meaning": "", "importance": ""}}
        }"#
        .to_string()
    }

    #[test]
    fn v1_record_loads_with_empty_attributes() {
        let record = import(&minimal_v1()).unwrap();
        assert_eq!(record.version, "1.0");
        assert!(record.field_attributes.is_empty());
        assert_eq!(record.field_weights["age"], 1.0);
    }

    #[test]
    fn upgrade_stamps_current_version() {
        let record = upgrade(import(&minimal_v1()).unwrap());
        assert_eq!(record.version, CURRENT_VERSION);
        assert!(record.field_attributes.is_empty());
    }

    #[test]
    fn future_versions_are_rejected() {
        let raw = minimal_v1().replace("\"1.0\"", "\"3.0\"");
        assert!(matches!(
            import(&raw),
            Err(ExportError::UnsupportedVersion(_))
        ));
    }
}
