use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("project id must not be empty")]
    InvalidProjectId,
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown weight key: {0}")]
    UnknownKey(String),
    #[error("weight key is locked: {0}")]
    LockedKey(String),
    #[error("field {0} has no non-empty values to profile")]
    EmptyField(String),
    #[error("field {field} has no attribute profile (type is {field_type})")]
    NoAttributes { field: String, field_type: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
