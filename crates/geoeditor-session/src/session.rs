use serde::{Deserialize, Serialize};
use tracing::info;

use geoeditor_model::{Category, Dataset, Feature, FeatureLayer, ProjectId, ProjectKind};
use geoeditor_store::{StoreError, StoreHandle};

use crate::error::{Result, SessionError};
use crate::requests::RequestTracker;

/// What the user is doing with the current project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectAction {
    Create,
    Edit,
    View,
}

impl ProjectAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectAction::Create => "create",
            ProjectAction::Edit => "edit",
            ProjectAction::View => "view",
        }
    }
}

/// A category or feature layer being assembled before its explicit save.
/// Datasets never draft: they enter the store when their features load.
#[derive(Debug, Clone)]
pub enum Draft {
    Category(Category),
    FeatureLayer(FeatureLayer),
}

/// Per-page-load authoring state.
///
/// The step machine runs 0..=4; which steps exist depends on the project
/// kind. Forward moves are gated on the current step's completion
/// predicate, backward moves are always allowed and lose nothing. All
/// other components read session state instead of ambient globals.
pub struct AuthoringSession {
    kind: ProjectKind,
    action: ProjectAction,
    step: u8,
    current_project: Option<ProjectId>,
    loaded_features: usize,
    draft: Option<Draft>,
    requests: RequestTracker,
}

impl AuthoringSession {
    pub fn new(kind: ProjectKind, action: ProjectAction) -> Self {
        Self {
            kind,
            action,
            step: 0,
            current_project: None,
            loaded_features: 0,
            draft: None,
            requests: RequestTracker::new(),
        }
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    pub fn action(&self) -> ProjectAction {
        self.action
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn current_project(&self) -> Option<&ProjectId> {
        self.current_project.as_ref()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn requests_mut(&mut self) -> &mut RequestTracker {
        &mut self.requests
    }

    /// Datasets walk load → select → weights → export; the grouping kinds
    /// walk members → weights → export.
    pub fn last_step(&self) -> u8 {
        match self.kind {
            ProjectKind::Dataset => 4,
            ProjectKind::Category | ProjectKind::FeatureLayer => 3,
        }
    }

    fn step_blocker(&self) -> Option<String> {
        match (self.kind, self.step) {
            (_, 0) => None,
            (ProjectKind::Dataset, 1) => {
                if self.loaded_features == 0 {
                    Some("no features loaded".to_string())
                } else {
                    None
                }
            }
            (ProjectKind::Category, 1) => match &self.draft {
                Some(Draft::Category(category)) if !category.dataset_ids.is_empty() => None,
                _ => Some("choose at least one member dataset".to_string()),
            },
            (ProjectKind::FeatureLayer, 1) => match &self.draft {
                Some(Draft::FeatureLayer(layer)) if !layer.category_ids.is_empty() => None,
                _ => Some("choose at least one member category".to_string()),
            },
            // Weighting steps never require the sum to land on 100; the
            // export step surfaces the warning instead.
            _ => None,
        }
    }

    /// Move forward one step if the current step's completion predicate
    /// holds. Leaving a step cancels the requests issued on it; a response
    /// landing after the move would update state the user is done with.
    pub fn advance(&mut self) -> Result<u8> {
        if self.step >= self.last_step() {
            return Err(SessionError::AtLastStep);
        }
        if let Some(reason) = self.step_blocker() {
            return Err(SessionError::StepIncomplete {
                step: self.step,
                reason,
            });
        }
        self.cancel_project_requests();
        self.step += 1;
        Ok(self.step)
    }

    /// Navigate to any earlier (or the current) step. State is additive
    /// within a session, so nothing is discarded; in-flight requests for
    /// the abandoned step are cancelled.
    pub fn go_to(&mut self, step: u8) -> Result<u8> {
        if step > self.step {
            return Err(SessionError::StepIncomplete {
                step: self.step,
                reason: "forward navigation goes through advance".to_string(),
            });
        }
        self.cancel_project_requests();
        self.step = step;
        Ok(self.step)
    }

    fn request_prefix(&self) -> String {
        match &self.current_project {
            Some(id) => format!("{}:{}", self.kind, id),
            None => format!("{}:draft", self.kind),
        }
    }

    /// Scope name for a server request tied to the current project.
    pub fn request_scope(&self, facet: &str) -> String {
        format!("{}:{}", self.request_prefix(), facet)
    }

    fn cancel_project_requests(&mut self) {
        let prefix = self.request_prefix();
        self.requests.cancel_prefix(&prefix);
    }

    /// Load features for a dataset. Loads are expensive, so the dataset is
    /// pushed into the store immediately; a later load on the same session
    /// re-ingests into the existing project.
    pub fn load_dataset(
        &mut self,
        store: &mut StoreHandle,
        name: &str,
        features: Vec<Feature>,
    ) -> Result<ProjectId> {
        if self.kind != ProjectKind::Dataset {
            return Err(SessionError::WrongDraftKind { expected: "dataset" });
        }
        self.loaded_features = features.len();
        let id = match &self.current_project {
            Some(id) => {
                let id = id.clone();
                store.update_dataset(&id, |dataset| {
                    dataset.field_model = geoeditor_model::FieldModel::ingest(&features);
                    dataset.raw_features = features;
                    Ok(())
                })?;
                id
            }
            None => {
                let dataset = Dataset::new(name, features);
                let id = store.insert_dataset(dataset)?;
                self.current_project = Some(id.clone());
                id
            }
        };
        info!(project = %id, features = self.loaded_features, "dataset loaded");
        Ok(id)
    }

    /// Start (or restart) a grouping draft. Drafts are cheap to rebuild, so
    /// they stay out of the store until `save_draft`.
    pub fn begin_draft(&mut self, name: &str) -> Result<()> {
        self.draft = Some(match self.kind {
            ProjectKind::Category => Draft::Category(Category::new(name)),
            ProjectKind::FeatureLayer => Draft::FeatureLayer(FeatureLayer::new(name)),
            ProjectKind::Dataset => {
                return Err(SessionError::WrongDraftKind {
                    expected: "category or featurelayer",
                });
            }
        });
        Ok(())
    }

    /// Attach a member to the draft, rejecting ids the store does not hold.
    pub fn attach_member(&mut self, store: &StoreHandle, member: &ProjectId) -> Result<()> {
        match &mut self.draft {
            Some(Draft::Category(category)) => {
                if store.store().dataset(member).is_none() {
                    return Err(StoreError::MissingMember(member.clone()).into());
                }
                category.attach_dataset(member.clone());
                Ok(())
            }
            Some(Draft::FeatureLayer(layer)) => {
                if store.store().category(member).is_none() {
                    return Err(StoreError::MissingMember(member.clone()).into());
                }
                layer.attach_category(member.clone());
                Ok(())
            }
            None => Err(SessionError::NoCurrentProject),
        }
    }

    pub fn detach_member(&mut self, member: &ProjectId) -> Result<()> {
        match &mut self.draft {
            Some(Draft::Category(category)) => {
                category.detach_dataset(member);
                Ok(())
            }
            Some(Draft::FeatureLayer(layer)) => {
                layer.detach_category(member);
                Ok(())
            }
            None => Err(SessionError::NoCurrentProject),
        }
    }

    /// Set one member's percent weight on the draft.
    pub fn set_member_weight(&mut self, member: &ProjectId, weight: f64) -> Result<()> {
        match &mut self.draft {
            Some(Draft::Category(category)) => {
                category.dataset_weights.update(member.as_str(), weight)?;
                Ok(())
            }
            Some(Draft::FeatureLayer(layer)) => {
                layer.category_weights.update(member.as_str(), weight)?;
                Ok(())
            }
            None => Err(SessionError::NoCurrentProject),
        }
    }

    /// Push the draft into the store. The draft is kept so the user can
    /// keep editing; the session now references the stored project.
    pub fn save_draft(&mut self, store: &mut StoreHandle) -> Result<ProjectId> {
        let id = match &self.draft {
            Some(Draft::Category(category)) => store.insert_category(category.clone())?,
            Some(Draft::FeatureLayer(layer)) => store.insert_feature_layer(layer.clone())?,
            None => return Err(SessionError::NoCurrentProject),
        };
        self.current_project = Some(id.clone());
        info!(project = %id, kind = %self.kind, "draft saved to store");
        Ok(id)
    }

    /// Switch the session to a different stored project, cancelling every
    /// request that belonged to the abandoned one.
    pub fn switch_project(&mut self, id: ProjectId) {
        self.cancel_project_requests();
        self.current_project = Some(id);
        self.step = 0;
        self.loaded_features = 0;
        self.draft = None;
    }
}
