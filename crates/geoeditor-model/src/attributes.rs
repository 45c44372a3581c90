use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::feature::{Feature, field_samples};
use crate::weights::WeightVector;

/// Free-form, human-entered annotation attached to a value or field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub importance: String,
}

/// Frequency profile of one qualitative field.
///
/// `unique_values` is ordered by descending count, ties broken by the string
/// itself, so two permutations of the same feature list profile identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeProfile {
    pub unique_values: Vec<String>,
    pub value_counts: BTreeMap<String, u64>,
    pub weights: WeightVector,
    pub meta: BTreeMap<String, Meta>,
}

impl AttributeProfile {
    /// Profile a field across a feature collection. Null, absent, and
    /// empty-string values are skipped; everything else is keyed by its
    /// string rendering.
    pub fn profile(field: &str, features: &[Feature]) -> Result<Self> {
        let mut value_counts: BTreeMap<String, u64> = BTreeMap::new();
        for value in field_samples(features, field) {
            if let Some(key) = value.display_key() {
                *value_counts.entry(key).or_insert(0) += 1;
            }
        }
        if value_counts.is_empty() {
            return Err(ModelError::EmptyField(field.to_string()));
        }

        let mut unique_values: Vec<String> = value_counts.keys().cloned().collect();
        unique_values.sort_by(|a, b| {
            value_counts[b]
                .cmp(&value_counts[a])
                .then_with(|| a.cmp(b))
        });

        let weights = WeightVector::percent_equal(unique_values.iter().cloned());
        let meta = unique_values
            .iter()
            .map(|value| (value.clone(), Meta::default()))
            .collect();

        Ok(Self {
            unique_values,
            value_counts,
            weights,
            meta,
        })
    }

    /// The recovery shape for a qualitative field with no observed values:
    /// still selectable, contributes nothing.
    pub fn empty() -> Self {
        Self {
            unique_values: Vec::new(),
            value_counts: BTreeMap::new(),
            weights: WeightVector::percent(),
            meta: BTreeMap::new(),
        }
    }

    pub fn set_value_meta(&mut self, value: &str, meaning: Option<String>, importance: Option<String>) {
        let entry = self.meta.entry(value.to_string()).or_default();
        if let Some(meaning) = meaning {
            entry.meaning = meaning;
        }
        if let Some(importance) = importance {
            entry.importance = importance;
        }
    }
}
