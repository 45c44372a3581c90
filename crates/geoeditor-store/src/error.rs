use geoeditor_model::ProjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("project id already exists: {0}")]
    DuplicateId(ProjectId),
    #[error("unknown project id: {0}")]
    UnknownId(ProjectId),
    #[error("{id} is still referenced by {referers:?}; remove the referers first")]
    Referenced {
        id: ProjectId,
        referers: Vec<ProjectId>,
    },
    #[error("member id does not exist in the store: {0}")]
    MissingMember(ProjectId),
    #[error(transparent)]
    Model(#[from] geoeditor_model::ModelError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
