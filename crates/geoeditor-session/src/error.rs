use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("step {step} is not complete: {reason}")]
    StepIncomplete { step: u8, reason: String },
    #[error("already at the last step for this project kind")]
    AtLastStep,
    #[error("no project is under edit")]
    NoCurrentProject,
    #[error("the current draft is not a {expected}")]
    WrongDraftKind { expected: &'static str },
    #[error(transparent)]
    Store(#[from] geoeditor_store::StoreError),
    #[error(transparent)]
    Model(#[from] geoeditor_model::ModelError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
