//! Team data file store
//!
//! Reads and replaces the single JSON document holding the team's planning
//! state. Every call hits the file; there is no cache and no locking, so
//! concurrent writers race and the last one wins.

use crate::error::{PlannerError, PlannerResult};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Accessor for the team-data JSON file
#[derive(Debug, Clone)]
pub struct TeamDataStore {
    path: PathBuf,
}

impl TeamDataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document exactly as stored
    pub async fn load_document(&self) -> PlannerResult<Value> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "team data unreadable");
            PlannerError::DataUnavailable(e.to_string())
        })?;

        serde_json::from_str(&content).map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "team data is not valid JSON");
            PlannerError::DataUnavailable(e.to_string())
        })
    }

    /// Overwrite the whole file with `document`, pretty-printed
    pub async fn replace(&self, document: &Value) -> PlannerResult<()> {
        let content = serde_json::to_string_pretty(document)
            .map_err(|e| PlannerError::WriteFailure(e.to_string()))?;

        tokio::fs::write(&self.path, content).await.map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "team data write failed");
            PlannerError::WriteFailure(e.to_string())
        })?;

        tracing::info!(path = %self.path.display(), "team data replaced");
        Ok(())
    }
}
