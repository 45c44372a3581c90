#![deny(unsafe_code)]

pub mod artifacts;
pub mod error;
pub mod persistence;
pub mod store;

pub use artifacts::{ArtifactDir, ArtifactError};
pub use error::{Result, StoreError};
pub use persistence::{FileSlot, LocalSlot, PROJECTS_SLOT_KEY, RemoteSink, StoreHandle};
pub use store::ProjectStore;
