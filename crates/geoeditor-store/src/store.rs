use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use geoeditor_model::{Category, Dataset, FeatureLayer, Project, ProjectId, ProjectKind};

use crate::error::{Result, StoreError};

/// The process-wide set of authored projects.
///
/// All mutation funnels through this API; lookups hand out clones so UI-side
/// code can never write the backing maps. Referential integrity is checked
/// on insert (members must exist) and on delete (referers must be gone).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectStore {
    datasets: BTreeMap<ProjectId, Dataset>,
    categories: BTreeMap<ProjectId, Category>,
    feature_layers: BTreeMap<ProjectId, FeatureLayer>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty() && self.categories.is_empty() && self.feature_layers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.datasets.len() + self.categories.len() + self.feature_layers.len()
    }

    fn assert_fresh(&self, id: &ProjectId) -> Result<()> {
        if self.datasets.contains_key(id)
            || self.categories.contains_key(id)
            || self.feature_layers.contains_key(id)
        {
            return Err(StoreError::DuplicateId(id.clone()));
        }
        Ok(())
    }

    pub fn insert_dataset(&mut self, dataset: Dataset) -> Result<ProjectId> {
        self.assert_fresh(&dataset.id)?;
        let id = dataset.id.clone();
        self.datasets.insert(id.clone(), dataset);
        Ok(id)
    }

    /// Categories may only reference datasets the store already holds.
    pub fn insert_category(&mut self, category: Category) -> Result<ProjectId> {
        self.assert_fresh(&category.id)?;
        for member in &category.dataset_ids {
            if !self.datasets.contains_key(member) {
                return Err(StoreError::MissingMember(member.clone()));
            }
        }
        let id = category.id.clone();
        self.categories.insert(id.clone(), category);
        Ok(id)
    }

    pub fn insert_feature_layer(&mut self, layer: FeatureLayer) -> Result<ProjectId> {
        self.assert_fresh(&layer.id)?;
        for member in &layer.category_ids {
            if !self.categories.contains_key(member) {
                return Err(StoreError::MissingMember(member.clone()));
            }
        }
        let id = layer.id.clone();
        self.feature_layers.insert(id.clone(), layer);
        Ok(id)
    }

    pub fn dataset(&self, id: &ProjectId) -> Option<&Dataset> {
        self.datasets.get(id)
    }

    pub fn category(&self, id: &ProjectId) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn feature_layer(&self, id: &ProjectId) -> Option<&FeatureLayer> {
        self.feature_layers.get(id)
    }

    /// Kind-erased snapshot lookup.
    pub fn get(&self, id: &ProjectId) -> Option<Project> {
        if let Some(dataset) = self.datasets.get(id) {
            return Some(Project::Dataset(dataset.clone()));
        }
        if let Some(category) = self.categories.get(id) {
            return Some(Project::Category(category.clone()));
        }
        self.feature_layers
            .get(id)
            .map(|layer| Project::FeatureLayer(layer.clone()))
    }

    pub fn update_dataset<F>(&mut self, id: &ProjectId, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Dataset) -> Result<()>,
    {
        let dataset = self
            .datasets
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownId(id.clone()))?;
        mutate(dataset)?;
        dataset.touch();
        Ok(())
    }

    pub fn update_category<F>(&mut self, id: &ProjectId, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Category) -> Result<()>,
    {
        // Mutate a copy and only commit once member validation passes, so a
        // failed update leaves the store unchanged.
        let mut category = self
            .categories
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::UnknownId(id.clone()))?;
        mutate(&mut category)?;
        for member in &category.dataset_ids {
            if !self.datasets.contains_key(member) {
                return Err(StoreError::MissingMember(member.clone()));
            }
        }
        category.touch();
        self.categories.insert(id.clone(), category);
        Ok(())
    }

    pub fn update_feature_layer<F>(&mut self, id: &ProjectId, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut FeatureLayer) -> Result<()>,
    {
        let mut layer = self
            .feature_layers
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::UnknownId(id.clone()))?;
        mutate(&mut layer)?;
        for member in &layer.category_ids {
            if !self.categories.contains_key(member) {
                return Err(StoreError::MissingMember(member.clone()));
            }
        }
        layer.touch();
        self.feature_layers.insert(id.clone(), layer);
        Ok(())
    }

    /// Delete a project. Deleting a referenced dataset or category fails and
    /// leaves the store unchanged; the caller must detach referers first.
    pub fn delete(&mut self, id: &ProjectId) -> Result<Project> {
        if self.datasets.contains_key(id) {
            let referers: Vec<ProjectId> = self
                .categories
                .values()
                .filter(|category| category.references(id))
                .map(|category| category.id.clone())
                .collect();
            if !referers.is_empty() {
                return Err(StoreError::Referenced {
                    id: id.clone(),
                    referers,
                });
            }
            let dataset = self.datasets.remove(id).expect("checked above");
            return Ok(Project::Dataset(dataset));
        }
        if self.categories.contains_key(id) {
            let referers: Vec<ProjectId> = self
                .feature_layers
                .values()
                .filter(|layer| layer.references(id))
                .map(|layer| layer.id.clone())
                .collect();
            if !referers.is_empty() {
                return Err(StoreError::Referenced {
                    id: id.clone(),
                    referers,
                });
            }
            let category = self.categories.remove(id).expect("checked above");
            return Ok(Project::Category(category));
        }
        self.feature_layers
            .remove(id)
            .map(Project::FeatureLayer)
            .ok_or_else(|| StoreError::UnknownId(id.clone()))
    }

    /// Owned snapshots of one kind, in id order. Callers must not treat the
    /// clones as live views.
    pub fn list(&self, kind: ProjectKind) -> Vec<Project> {
        match kind {
            ProjectKind::Dataset => self
                .datasets
                .values()
                .cloned()
                .map(Project::Dataset)
                .collect(),
            ProjectKind::Category => self
                .categories
                .values()
                .cloned()
                .map(Project::Category)
                .collect(),
            ProjectKind::FeatureLayer => self
                .feature_layers
                .values()
                .cloned()
                .map(Project::FeatureLayer)
                .collect(),
        }
    }
}
