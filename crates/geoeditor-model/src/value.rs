use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single observed value of a feature property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Arrays and objects pass through untyped; they classify as qualitative.
    Complex(serde_json::Value),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Coerce to a number for statistics. Returns None for values with no
    /// numeric reading (NaN is treated as no reading).
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Value::Number(n) => *n,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
            Value::Null | Value::Complex(_) => return None,
        };
        if n.is_nan() { None } else { Some(n) }
    }

    /// Render the value the way attribute profiling keys it: numbers drop a
    /// trailing `.0`, everything else uses its natural string form.
    pub fn display_key(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            Value::Text(s) => {
                if s.is_empty() {
                    None
                } else {
                    Some(s.clone())
                }
            }
            Value::Complex(v) => Some(v.to_string()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Value::Number(f),
                None => Value::Complex(serde_json::Value::Number(n)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Complex(other),
        }
    }
}

/// The inferred class of a field across a feature collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Quantitative,
    Qualitative,
    Boolean,
    Unknown,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Quantitative => "quantitative",
            FieldType::Qualitative => "qualitative",
            FieldType::Boolean => "boolean",
            FieldType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quantitative" => Ok(FieldType::Quantitative),
            "qualitative" => Ok(FieldType::Qualitative),
            "boolean" => Ok(FieldType::Boolean),
            "unknown" => Ok(FieldType::Unknown),
            _ => Err(format!("Unknown field type: {}", s)),
        }
    }
}

/// Classify a single value. Deterministic: the same input always yields the
/// same class.
pub fn classify(value: &Value) -> FieldType {
    match value {
        Value::Null => FieldType::Unknown,
        Value::Bool(_) => FieldType::Boolean,
        Value::Number(n) if n.is_finite() => FieldType::Quantitative,
        _ => FieldType::Qualitative,
    }
}

/// Classify a field from its samples: the first non-null value wins. No
/// majority vote; `Unknown` when every sample is null.
pub fn classify_field<'a, I>(samples: I) -> FieldType
where
    I: IntoIterator<Item = &'a Value>,
{
    samples
        .into_iter()
        .find(|value| !value.is_null())
        .map_or(FieldType::Unknown, classify)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_covers_all_classes() {
        assert_eq!(classify(&Value::Null), FieldType::Unknown);
        assert_eq!(classify(&Value::Bool(true)), FieldType::Boolean);
        assert_eq!(classify(&Value::Number(3.5)), FieldType::Quantitative);
        assert_eq!(classify(&Value::Number(f64::NAN)), FieldType::Qualitative);
        assert_eq!(
            classify(&Value::Text("north".into())),
            FieldType::Qualitative
        );
        assert_eq!(
            classify(&Value::Complex(serde_json::json!([1, 2]))),
            FieldType::Qualitative
        );
    }

    #[test]
    fn first_non_null_sample_wins() {
        let samples = vec![
            Value::Null,
            Value::Text("S".into()),
            Value::Number(4.0),
        ];
        assert_eq!(classify_field(&samples), FieldType::Qualitative);
        assert_eq!(classify_field(&[]), FieldType::Unknown);
    }

    #[test]
    fn numeric_display_key_drops_fraction() {
        assert_eq!(Value::Number(2.0).display_key().unwrap(), "2");
        assert_eq!(Value::Number(2.5).display_key().unwrap(), "2.5");
        assert_eq!(Value::Text(String::new()).display_key(), None);
    }
}
