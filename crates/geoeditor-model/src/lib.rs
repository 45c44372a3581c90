#![deny(unsafe_code)]

pub mod attributes;
pub mod error;
pub mod feature;
pub mod field;
pub mod ids;
pub mod project;
pub mod value;
pub mod weights;

pub use attributes::{AttributeProfile, Meta};
pub use error::{ModelError, Result};
pub use feature::{Feature, field_names, field_samples};
pub use field::{FieldEntry, FieldModel, MetaKey};
pub use ids::ProjectId;
pub use project::{Category, Dataset, FeatureLayer, Project, ProjectKind};
pub use value::{FieldType, Value, classify, classify_field};
pub use weights::{WeightBand, WeightVector};
