#![deny(unsafe_code)]

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};

use crate::error::{ModelError, Result};

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// An opaque, stable project identifier.
///
/// Ids are rendered as `proj_` followed by lowercase hex. Uniqueness is
/// asserted by the store on insert, not here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    /// Wrap an externally supplied id (e.g. from an imported record).
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidProjectId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generate a fresh id from the project name, the wall clock, and a
    /// process-wide counter, digested so the rendered form stays short.
    pub fn generate(name: &str) -> Self {
        let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(now.to_le_bytes());
        hasher.update(counter.to_le_bytes());
        let digest = hasher.finalize();
        Self(format!("proj_{}", hex::encode(&digest[..8])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl serde::Serialize for ProjectId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ProjectId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ProjectId::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_differ() {
        let a = ProjectId::generate("demo");
        let b = ProjectId::generate("demo");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("proj_"));
    }

    #[test]
    fn rejects_blank_id() {
        assert!(ProjectId::new("   ").is_err());
    }
}
