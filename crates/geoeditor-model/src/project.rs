use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::feature::Feature;
use crate::field::FieldModel;
use crate::ids::ProjectId;
use crate::weights::WeightVector;

/// The three project kinds the store manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Dataset,
    Category,
    #[serde(rename = "featurelayer")]
    FeatureLayer,
}

impl ProjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Dataset => "dataset",
            ProjectKind::Category => "category",
            ProjectKind::FeatureLayer => "featurelayer",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dataset" => Ok(ProjectKind::Dataset),
            "category" => Ok(ProjectKind::Category),
            "featurelayer" | "feature_layer" | "feature layer" => Ok(ProjectKind::FeatureLayer),
            _ => Err(format!("Unknown project kind: {}", s)),
        }
    }
}

/// A loaded feature collection with its field model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Raw features are carried opaquely; geometry is never interpreted.
    pub raw_features: Vec<Feature>,
    pub field_model: FieldModel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, features: Vec<Feature>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: ProjectId::generate(&name),
            field_model: FieldModel::ingest(&features),
            name,
            description: String::new(),
            raw_features: features,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A weighted grouping of datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub dataset_ids: Vec<ProjectId>,
    /// Percent weights; key set always equals `dataset_ids`.
    pub dataset_weights: WeightVector,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: ProjectId::generate(&name),
            name,
            description: String::new(),
            dataset_ids: Vec::new(),
            dataset_weights: WeightVector::percent(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a member dataset, keeping the weight key set in sync. The store
    /// checks the id actually exists before calling this.
    pub fn attach_dataset(&mut self, id: ProjectId) {
        if !self.dataset_ids.contains(&id) {
            self.dataset_weights.insert_key(id.as_str());
            self.dataset_ids.push(id);
            self.dataset_weights.set_equal();
        }
    }

    pub fn detach_dataset(&mut self, id: &ProjectId) {
        if let Some(position) = self.dataset_ids.iter().position(|member| member == id) {
            self.dataset_ids.remove(position);
            self.dataset_weights.remove_key(id.as_str());
            self.dataset_weights.set_equal();
        }
    }

    pub fn references(&self, id: &ProjectId) -> bool {
        self.dataset_ids.contains(id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A weighted grouping of categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureLayer {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_ids: Vec<ProjectId>,
    /// Percent weights; key set always equals `category_ids`.
    pub category_weights: WeightVector,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeatureLayer {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: ProjectId::generate(&name),
            name,
            description: String::new(),
            category_ids: Vec::new(),
            category_weights: WeightVector::percent(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn attach_category(&mut self, id: ProjectId) {
        if !self.category_ids.contains(&id) {
            self.category_weights.insert_key(id.as_str());
            self.category_ids.push(id);
            self.category_weights.set_equal();
        }
    }

    pub fn detach_category(&mut self, id: &ProjectId) {
        if let Some(position) = self.category_ids.iter().position(|member| member == id) {
            self.category_ids.remove(position);
            self.category_weights.remove_key(id.as_str());
            self.category_weights.set_equal();
        }
    }

    pub fn references(&self, id: &ProjectId) -> bool {
        self.category_ids.contains(id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A kind-erased view used by store lookups and exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Project {
    Dataset(Dataset),
    Category(Category),
    #[serde(rename = "featurelayer")]
    FeatureLayer(FeatureLayer),
}

impl Project {
    pub fn id(&self) -> &ProjectId {
        match self {
            Project::Dataset(dataset) => &dataset.id,
            Project::Category(category) => &category.id,
            Project::FeatureLayer(layer) => &layer.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Project::Dataset(dataset) => &dataset.name,
            Project::Category(category) => &category.name,
            Project::FeatureLayer(layer) => &layer.name,
        }
    }

    pub fn kind(&self) -> ProjectKind {
        match self {
            Project::Dataset(_) => ProjectKind::Dataset,
            Project::Category(_) => ProjectKind::Category,
            Project::FeatureLayer(_) => ProjectKind::FeatureLayer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_weights_track_member_list() {
        let mut category = Category::new("infrastructure");
        let a = ProjectId::generate("a");
        let b = ProjectId::generate("b");
        category.attach_dataset(a.clone());
        category.attach_dataset(b.clone());
        assert_eq!(category.dataset_ids.len(), 2);
        assert!((category.dataset_weights.total() - 100.0).abs() < 1e-9);
        assert!((category.dataset_weights.get(a.as_str()).unwrap() - 50.0).abs() < 1e-9);

        category.detach_dataset(&a);
        assert_eq!(category.dataset_ids, vec![b.clone()]);
        assert_eq!(category.dataset_weights.len(), 1);
        assert!((category.dataset_weights.get(b.as_str()).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn attach_is_idempotent() {
        let mut layer = FeatureLayer::new("composite");
        let id = ProjectId::generate("c");
        layer.attach_category(id.clone());
        layer.attach_category(id.clone());
        assert_eq!(layer.category_ids.len(), 1);
    }

    #[test]
    fn kind_strings_round_trip() {
        for kind in [
            ProjectKind::Dataset,
            ProjectKind::Category,
            ProjectKind::FeatureLayer,
        ] {
            assert_eq!(kind.as_str().parse::<ProjectKind>().unwrap(), kind);
        }
    }
}
