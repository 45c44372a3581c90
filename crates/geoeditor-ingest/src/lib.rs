#![deny(unsafe_code)]

pub mod csv_ingest;
pub mod error;
pub mod json;

pub use csv_ingest::{read_csv_features, read_csv_features_from_path};
pub use error::{ParseError, Result};
pub use json::parse_feature_collection;
