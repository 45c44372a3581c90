use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("not well-formed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("document has no `features` array")]
    MissingFeatures,
    #[error("feature {index} has neither `properties` nor `attributes`")]
    MissingProperties { index: usize },
    #[error("table has no data rows")]
    EmptyTable,
}

pub type Result<T> = std::result::Result<T, ParseError>;
