use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value as Json;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact names use alphanumerics, `_` and `-` only: {0:?}")]
    InvalidName(String),
    #[error("no such artifact: {0}")]
    Unknown(String),
    #[error("artifact body is not well-formed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Directory-backed manager for named JSON artifacts: each artifact is one
/// `<name>.json` file. Hosts without a server use this in place of the
/// artifact collaborator; the names and bodies are interchangeable.
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    dir: PathBuf,
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl ArtifactDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names stay inside the directory; anything that could traverse out
    /// is rejected before touching the filesystem.
    fn path_for(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        if !valid_name(name) {
            return Err(ArtifactError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Artifact names in the directory, sorted. A directory that does not
    /// exist yet lists as empty.
    pub fn list(&self) -> Result<Vec<String>, ArtifactError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json")
                && let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn load(&self, name: &str) -> Result<Json, ArtifactError> {
        let path = self.path_for(name)?;
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(ArtifactError::Unknown(name.to_string()));
            }
            Err(error) => return Err(error.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write via a temp-file rename, same as the project slot, so a crash
    /// mid-write cannot corrupt an existing artifact.
    pub fn save(&self, name: &str, body: &Json) -> Result<(), ArtifactError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        let staged = path.with_extension("json.tmp");
        fs::write(&staged, serde_json::to_string_pretty(body)?)?;
        fs::rename(&staged, &path)?;
        debug!(name, "artifact saved");
        Ok(())
    }
}
