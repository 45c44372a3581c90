use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use geoeditor_model::{Feature, Value};

use crate::error::{ParseError, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Coerce a CSV cell into a typed value so inference works the same on both
/// ingress paths: empty → null, numeric text → number, true/false → boolean,
/// anything else stays text.
fn coerce_cell(raw: &str) -> Value {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(number) = trimmed.parse::<f64>()
        && number.is_finite()
    {
        return Value::Number(number);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Text(trimmed.to_string()),
    }
}

/// Read a delimited table as a feature collection: headers become field
/// names, rows become property maps. There is no geometry on this path.
pub fn read_csv_features<R: Read>(reader: R) -> Result<Vec<Feature>> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut features = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let mut properties: BTreeMap<String, Value> = BTreeMap::new();
        for (index, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let cell = record.get(index).unwrap_or("");
            properties.insert(header.clone(), coerce_cell(cell));
        }
        features.push(Feature::new(properties));
    }
    if features.is_empty() {
        return Err(ParseError::EmptyTable);
    }
    debug!(rows = features.len(), columns = headers.len(), "csv table ingested");
    Ok(features)
}

pub fn read_csv_features_from_path(path: &Path) -> Result<Vec<Feature>> {
    let file = std::fs::File::open(path)?;
    read_csv_features(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_cells_by_shape() {
        assert_eq!(coerce_cell("31"), Value::Number(31.0));
        assert_eq!(coerce_cell(" true "), Value::Bool(true));
        assert_eq!(coerce_cell(""), Value::Null);
        assert_eq!(coerce_cell("north"), Value::Text("north".into()));
    }

    #[test]
    fn reads_rows_as_features() {
        let data = "age, region \n31,N\n42,S\n,N\n";
        let features = read_csv_features(data.as_bytes()).unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].value("age"), Some(&Value::Number(31.0)));
        assert_eq!(features[0].value("region"), Some(&Value::Text("N".into())));
        assert_eq!(features[2].value("age"), Some(&Value::Null));
    }

    #[test]
    fn empty_table_is_rejected() {
        let data = "age,region\n";
        assert!(matches!(
            read_csv_features(data.as_bytes()),
            Err(ParseError::EmptyTable)
        ));
    }
}
