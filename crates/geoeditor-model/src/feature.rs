use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One normalized feature: a property map plus an opaque geometry blob.
///
/// Ingress code is responsible for collapsing the `properties` / `attributes`
/// duck shapes into this single representation; nothing downstream looks at
/// geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub properties: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
}

impl Feature {
    pub fn new(properties: BTreeMap<String, Value>) -> Self {
        Self {
            properties,
            geometry: None,
        }
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.properties.get(field)
    }
}

/// Collect the union of property names across a collection, sorted.
pub fn field_names(features: &[Feature]) -> Vec<String> {
    let mut names = BTreeSet::new();
    for feature in features {
        for name in feature.properties.keys() {
            names.insert(name.clone());
        }
    }
    names.into_iter().collect()
}

/// Iterate a single field's values in feature order, treating absent
/// properties as null.
pub fn field_samples<'a>(features: &'a [Feature], field: &'a str) -> impl Iterator<Item = &'a Value> {
    features
        .iter()
        .map(move |feature| feature.value(field).unwrap_or(&Value::Null))
}
