use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attributes::{AttributeProfile, Meta};
use crate::error::{ModelError, Result};
use crate::feature::{Feature, field_names, field_samples};
use crate::value::{FieldType, classify_field};
use crate::weights::WeightVector;

/// Which half of a field's annotation a `set_meta` call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    Meaning,
    Importance,
}

/// Per-field state inside a dataset's field model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub field_type: FieldType,
    /// Fraction in [0, 1]; the UI renders percent.
    pub weight: f64,
    pub locked: bool,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributeProfile>,
}

/// The selected fields of one dataset, their inferred types, fraction
/// weights, and qualitative attribute profiles.
///
/// Field weights live in fraction space ([0, 1], nominal sum 1); attribute
/// weights inside each profile are percents. Both redistribute through
/// [`WeightVector`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldModel {
    pub fields: BTreeMap<String, FieldEntry>,
    pub selected: BTreeSet<String>,
}

impl FieldModel {
    /// Build a field model from a feature collection: infer each field's
    /// type from its first non-null sample and profile qualitative fields.
    /// A qualitative field with no observed values keeps an empty profile
    /// rather than failing the whole ingest.
    pub fn ingest(features: &[Feature]) -> Self {
        let mut fields = BTreeMap::new();
        for name in field_names(features) {
            let field_type = classify_field(field_samples(features, &name));
            let attributes = if field_type == FieldType::Qualitative {
                match AttributeProfile::profile(&name, features) {
                    Ok(profile) => Some(profile),
                    Err(ModelError::EmptyField(_)) => Some(AttributeProfile::empty()),
                    Err(_) => None,
                }
            } else {
                None
            };
            fields.insert(
                name,
                FieldEntry {
                    field_type,
                    weight: 0.0,
                    locked: false,
                    meta: Meta::default(),
                    attributes,
                },
            );
        }
        debug!(fields = fields.len(), "field model ingested");
        Self {
            fields,
            selected: BTreeSet::new(),
        }
    }

    pub fn entry(&self, field: &str) -> Result<&FieldEntry> {
        self.fields
            .get(field)
            .ok_or_else(|| ModelError::UnknownField(field.to_string()))
    }

    fn entry_mut(&mut self, field: &str) -> Result<&mut FieldEntry> {
        self.fields
            .get_mut(field)
            .ok_or_else(|| ModelError::UnknownField(field.to_string()))
    }

    pub fn is_selected(&self, field: &str) -> bool {
        self.selected.contains(field)
    }

    pub fn selected_weight_sum(&self) -> f64 {
        self.selected
            .iter()
            .filter_map(|field| self.fields.get(field))
            .map(|entry| entry.weight)
            .sum()
    }

    /// Select or deselect a field, rebalancing the remaining selection.
    ///
    /// A newly selected field takes `1 / (n + 1)` of the budget and the
    /// other unlocked selected fields shrink proportionally so the sum
    /// returns to 1. Deselecting frees the field's weight and spreads it
    /// equally over the remaining unlocked selected fields.
    pub fn select(&mut self, field: &str, selected: bool) -> Result<()> {
        self.entry(field)?;
        if selected {
            if self.selected.contains(field) {
                return Ok(());
            }
            let incoming = 1.0 / (self.selected.len() as f64 + 1.0);
            let locked_sum: f64 = self
                .selected
                .iter()
                .filter(|other| self.fields[*other].locked)
                .map(|other| self.fields[other].weight)
                .sum();
            let unlocked: Vec<String> = self
                .selected
                .iter()
                .filter(|other| !self.fields[*other].locked)
                .cloned()
                .collect();
            let unlocked_sum: f64 = unlocked
                .iter()
                .map(|other| self.fields[other].weight)
                .sum();
            let target = (1.0 - incoming - locked_sum).max(0.0);
            if unlocked_sum > f64::EPSILON {
                let scale = target / unlocked_sum;
                for other in &unlocked {
                    let entry = self.fields.get_mut(other).expect("selected field exists");
                    entry.weight *= scale;
                }
            } else if !unlocked.is_empty() {
                let share = target / unlocked.len() as f64;
                for other in &unlocked {
                    let entry = self.fields.get_mut(other).expect("selected field exists");
                    entry.weight = share;
                }
            }
            self.entry_mut(field)?.weight = incoming;
            self.selected.insert(field.to_string());
        } else {
            if !self.selected.remove(field) {
                return Ok(());
            }
            let freed = {
                let entry = self.entry_mut(field)?;
                let weight = entry.weight;
                entry.weight = 0.0;
                weight
            };
            let unlocked: Vec<String> = self
                .selected
                .iter()
                .filter(|other| !self.fields[*other].locked)
                .cloned()
                .collect();
            if !unlocked.is_empty() {
                let share = freed / unlocked.len() as f64;
                for other in &unlocked {
                    let entry = self.fields.get_mut(other).expect("selected field exists");
                    entry.weight += share;
                }
            }
        }
        Ok(())
    }

    /// Set one selected field's fraction weight, redistributing the delta
    /// across the other unlocked selected fields.
    pub fn update_weight(&mut self, field: &str, weight: f64) -> Result<()> {
        if !self.selected.contains(field) {
            return Err(ModelError::UnknownField(field.to_string()));
        }
        let mut vector = self.selection_vector();
        vector.update(field, weight)?;
        self.apply_selection_vector(&vector);
        Ok(())
    }

    /// Equal split over the unlocked selected fields, preserving locked
    /// weights (mirrors `WeightVector::set_equal` in fraction space).
    pub fn set_equal_weights(&mut self) {
        let mut vector = self.selection_vector();
        vector.set_equal();
        self.apply_selection_vector(&vector);
    }

    fn selection_vector(&self) -> WeightVector {
        let mut vector = WeightVector::fraction();
        for field in &self.selected {
            let entry = &self.fields[field];
            vector.insert_key(field.clone());
            vector.set_raw(field.clone(), entry.weight);
            if entry.locked {
                vector.lock(field).expect("key inserted just above");
            }
        }
        vector
    }

    fn apply_selection_vector(&mut self, vector: &WeightVector) {
        for (field, weight) in vector.entries() {
            if let Some(entry) = self.fields.get_mut(field) {
                entry.weight = *weight;
            }
        }
    }

    pub fn set_locked(&mut self, field: &str, locked: bool) -> Result<()> {
        self.entry_mut(field)?.locked = locked;
        Ok(())
    }

    /// Free-form annotation; no validation by design of the record format.
    pub fn set_meta(&mut self, field: &str, key: MetaKey, text: impl Into<String>) -> Result<()> {
        let entry = self.entry_mut(field)?;
        match key {
            MetaKey::Meaning => entry.meta.meaning = text.into(),
            MetaKey::Importance => entry.meta.importance = text.into(),
        }
        Ok(())
    }

    /// Per-attribute operations delegate to the field's profile vector.
    pub fn attribute_weights_mut(&mut self, field: &str) -> Result<&mut WeightVector> {
        let field_type = self.entry(field)?.field_type;
        let entry = self.entry_mut(field)?;
        entry
            .attributes
            .as_mut()
            .map(|profile| &mut profile.weights)
            .ok_or(ModelError::NoAttributes {
                field: field.to_string(),
                field_type: field_type.as_str().to_string(),
            })
    }

    pub fn attributes(&self, field: &str) -> Option<&AttributeProfile> {
        self.fields.get(field).and_then(|entry| entry.attributes.as_ref())
    }

    pub fn attributes_mut(&mut self, field: &str) -> Option<&mut AttributeProfile> {
        self.fields.get_mut(field).and_then(|entry| entry.attributes.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn features() -> Vec<Feature> {
        let rows: Vec<Vec<(&str, Value)>> = vec![
            vec![("age", Value::Number(31.0)), ("region", Value::Text("N".into()))],
            vec![("age", Value::Number(42.0)), ("region", Value::Text("S".into()))],
            vec![("age", Value::Null), ("region", Value::Text("N".into()))],
        ];
        rows.into_iter()
            .map(|row| {
                Feature::new(
                    row.into_iter()
                        .map(|(name, value)| (name.to_string(), value))
                        .collect(),
                )
            })
            .collect()
    }

    #[test]
    fn ingest_infers_types_and_profiles() {
        let model = FieldModel::ingest(&features());
        assert_eq!(model.entry("age").unwrap().field_type, FieldType::Quantitative);
        assert_eq!(model.entry("region").unwrap().field_type, FieldType::Qualitative);
        let profile = model.attributes("region").unwrap();
        assert_eq!(profile.unique_values, vec!["N", "S"]);
        assert_eq!(profile.value_counts["N"], 2);
        assert_eq!(profile.value_counts["S"], 1);
        assert!((profile.weights.get("N").unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn selection_keeps_sum_at_one() {
        let mut model = FieldModel::ingest(&features());
        model.select("age", true).unwrap();
        assert!((model.selected_weight_sum() - 1.0).abs() < 1e-9);
        model.select("region", true).unwrap();
        assert!((model.selected_weight_sum() - 1.0).abs() < 1e-9);
        assert!((model.entry("region").unwrap().weight - 0.5).abs() < 1e-9);
    }

    #[test]
    fn deselect_spreads_freed_weight() {
        let mut model = FieldModel::ingest(&features());
        model.select("age", true).unwrap();
        model.select("region", true).unwrap();
        model.select("age", false).unwrap();
        assert!((model.entry("region").unwrap().weight - 1.0).abs() < 1e-9);
        assert_eq!(model.entry("age").unwrap().weight, 0.0);
    }

    #[test]
    fn update_weight_redistributes_in_fraction_space() {
        let mut model = FieldModel::ingest(&features());
        model.select("age", true).unwrap();
        model.select("region", true).unwrap();
        model.update_weight("age", 0.8).unwrap();
        assert!((model.entry("age").unwrap().weight - 0.8).abs() < 1e-9);
        assert!((model.entry("region").unwrap().weight - 0.2).abs() < 1e-9);
    }

    #[test]
    fn locked_selected_field_survives_weight_updates() {
        let mut model = FieldModel::ingest(&features());
        model.select("age", true).unwrap();
        model.select("region", true).unwrap();
        model.set_locked("region", true).unwrap();

        model.update_weight("age", 0.8).unwrap();
        assert!((model.entry("region").unwrap().weight - 0.5).abs() < 1e-9);
        assert!(matches!(
            model.update_weight("region", 0.1),
            Err(ModelError::LockedKey(_))
        ));
    }

    #[test]
    fn attribute_delegation_requires_a_profile() {
        let mut model = FieldModel::ingest(&features());
        assert!(model.attribute_weights_mut("age").is_err());
        let weights = model.attribute_weights_mut("region").unwrap();
        weights.update("N", 70.0).unwrap();
        assert!((weights.get("S").unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn meta_is_free_form() {
        let mut model = FieldModel::ingest(&features());
        model.set_meta("age", MetaKey::Meaning, "resident age").unwrap();
        assert_eq!(model.entry("age").unwrap().meta.meaning, "resident age");
    }
}
