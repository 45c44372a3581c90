use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value as Json;
use tracing::{debug, warn};

use geoeditor_api::{ApiError, Client, SaveProjectsRequest, Transport};
use geoeditor_model::{Category, Dataset, FeatureLayer, ProjectId};

use crate::error::Result;
use crate::store::ProjectStore;

/// Slot key the browser build persists under; the file-backed slot mirrors
/// it as a file name so the two stay interchangeable.
pub const PROJECTS_SLOT_KEY: &str = "geoeditor_projects";

/// A durable local slot for the whole store. Survives restarts on the same
/// client; failures are reported but never roll anything back.
pub trait LocalSlot {
    fn read(&self) -> io::Result<Option<String>>;
    fn write(&self, payload: &str) -> io::Result<()>;
}

/// File-backed slot: `<dir>/geoeditor_projects.json`, written via a
/// temp-file rename so a crash mid-write cannot corrupt the previous copy.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{PROJECTS_SLOT_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalSlot for FileSlot {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn write(&self, payload: &str) -> io::Result<()> {
        let staged = self.path.with_extension("json.tmp");
        std::fs::write(&staged, payload)?;
        std::fs::rename(&staged, &self.path)
    }
}

/// Best-effort remote push of the serialized store.
pub trait RemoteSink {
    fn push_projects(&self, snapshot: Json) -> std::result::Result<(), ApiError>;
}

impl<T: Transport> RemoteSink for Client<T> {
    fn push_projects(&self, snapshot: Json) -> std::result::Result<(), ApiError> {
        let ack = self.save_projects(&SaveProjectsRequest { projects: snapshot })?;
        if ack.success {
            Ok(())
        } else {
            Err(ApiError::Server(
                ack.error.unwrap_or_else(|| "save rejected".to_string()),
            ))
        }
    }
}

/// The store plus its persistence sinks. Every mutation flushes the full
/// store: first to the local slot, then to the remote sink. Neither sink
/// failing fails the mutation or blocks later attempts.
pub struct StoreHandle {
    store: ProjectStore,
    slot: Box<dyn LocalSlot>,
    remote: Option<Box<dyn RemoteSink>>,
}

impl StoreHandle {
    /// Initialize from the local slot. A missing or unparseable slot starts
    /// an empty store with a logged warning rather than failing startup.
    pub fn load(slot: Box<dyn LocalSlot>, remote: Option<Box<dyn RemoteSink>>) -> Self {
        let store = match slot.read() {
            Ok(Some(payload)) => match serde_json::from_str::<ProjectStore>(&payload) {
                Ok(store) => store,
                Err(error) => {
                    warn!(%error, "persisted project slot is unparseable, starting empty");
                    ProjectStore::new()
                }
            },
            Ok(None) => ProjectStore::new(),
            Err(error) => {
                warn!(%error, "could not read project slot, starting empty");
                ProjectStore::new()
            }
        };
        Self { store, slot, remote }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn insert_dataset(&mut self, dataset: Dataset) -> Result<ProjectId> {
        let id = self.store.insert_dataset(dataset)?;
        self.flush();
        Ok(id)
    }

    pub fn insert_category(&mut self, category: Category) -> Result<ProjectId> {
        let id = self.store.insert_category(category)?;
        self.flush();
        Ok(id)
    }

    pub fn insert_feature_layer(&mut self, layer: FeatureLayer) -> Result<ProjectId> {
        let id = self.store.insert_feature_layer(layer)?;
        self.flush();
        Ok(id)
    }

    pub fn update_dataset<F>(&mut self, id: &ProjectId, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Dataset) -> Result<()>,
    {
        self.store.update_dataset(id, mutate)?;
        self.flush();
        Ok(())
    }

    pub fn update_category<F>(&mut self, id: &ProjectId, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Category) -> Result<()>,
    {
        self.store.update_category(id, mutate)?;
        self.flush();
        Ok(())
    }

    pub fn update_feature_layer<F>(&mut self, id: &ProjectId, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut FeatureLayer) -> Result<()>,
    {
        self.store.update_feature_layer(id, mutate)?;
        self.flush();
        Ok(())
    }

    pub fn delete(&mut self, id: &ProjectId) -> Result<()> {
        self.store.delete(id)?;
        self.flush();
        Ok(())
    }

    fn flush(&self) {
        let snapshot = match serde_json::to_value(&self.store) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(%error, "could not serialize project store, skipping flush");
                return;
            }
        };
        match serde_json::to_string(&snapshot) {
            Ok(payload) => {
                if let Err(error) = self.slot.write(&payload) {
                    warn!(%error, "local slot write failed");
                } else {
                    debug!(projects = self.store.len(), "project store flushed");
                }
            }
            Err(error) => warn!(%error, "could not render slot payload"),
        }
        if let Some(remote) = &self.remote
            && let Err(error) = remote.push_projects(snapshot)
        {
            warn!(%error, "remote project push failed, continuing");
        }
    }
}
