//! Local state file for the `rackdog` host.
//!
//! The file holds one [`ResourceState`] as pretty JSON. A missing file means
//! the server is absent.

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::resource::{ResourceState, ServerSpec};

pub const DEFAULT_STATE_PATH: &str = "rackdog.state.json";

const STATE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("state file {} is not valid: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("state file {} has version {found}, expected {expected}", .path.display())]
    Version {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

/// On-disk layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    /// Spec the server was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ServerSpec>,
    #[serde(default)]
    pub server: ResourceState,
}

impl StateDocument {
    pub fn new(server: ResourceState, spec: Option<ServerSpec>) -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            spec,
            server,
        }
    }
}

impl Default for StateDocument {
    fn default() -> Self {
        Self::new(ResourceState::Absent, None)
    }
}

#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<StateDocument, StateError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No state file, server is absent");
                return Ok(StateDocument::default());
            }
            Err(source) => return Err(self.io(source)),
        };

        let document: StateDocument =
            serde_json::from_slice(&bytes).map_err(|source| StateError::Json {
                path: self.path.clone(),
                source,
            })?;
        if document.version != STATE_VERSION {
            return Err(StateError::Version {
                path: self.path.clone(),
                found: document.version,
                expected: STATE_VERSION,
            });
        }
        Ok(document)
    }

    /// Write `document` via a sibling temp file and rename.
    pub async fn save(&self, document: &StateDocument) -> Result<(), StateError> {
        let json = serde_json::to_vec_pretty(document).map_err(|source| StateError::Json {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|source| self.io(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io(source))?;

        debug!(path = %self.path.display(), state = document.server.name(), "State saved");
        Ok(())
    }

    fn io(&self, source: io::Error) -> StateError {
        StateError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ServerRecord;
    use tempfile::TempDir;

    fn record() -> ServerRecord {
        ServerRecord {
            id: "srv-1".to_string(),
            plan_id: 10,
            location_id: 1,
            os_id: 62,
            raid: Some(1),
            hostname: Some("web-1".to_string()),
            ip_address: "10.0.0.1".to_string(),
            status: Some("ON".to_string()),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("state.json"));
        let document = file.load().await.unwrap();
        assert_eq!(document.server, ResourceState::Absent);
        assert!(document.spec.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let file = StateFile::new(dir.path().join("state.json"));
        let document = StateDocument::new(ResourceState::Present(record()), Some(record().spec()));

        file.save(&document).await.unwrap();
        assert!(!dir.path().join("state.json.tmp").exists());

        let loaded = file.load().await.unwrap();
        assert_eq!(loaded.server, ResourceState::Present(record()));
        assert_eq!(loaded.spec, Some(record().spec()));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let err = StateFile::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StateError::Json { .. }));
    }

    #[tokio::test]
    async fn test_unknown_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let mut document = StateDocument::default();
        document.version = 7;
        tokio::fs::write(&path, serde_json::to_vec(&document).unwrap())
            .await
            .unwrap();

        let err = StateFile::new(&path).load().await.unwrap_err();
        assert!(matches!(err, StateError::Version { found: 7, .. }));
    }
}
