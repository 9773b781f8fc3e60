//! State management for read deployments
//!
//! Manages the state file holding the identifier and the flattened record of
//! the last successful read. A read either replaces the whole record or, when
//! the deployment is gone remotely, clears it.

use crate::error::ReadResult;
use crate::resource::DeploymentRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// State file used when none is configured
pub const DEFAULT_STATE_FILE: &str = "vra-state.json";

const STATE_VERSION: u32 = 1;

/// Contents of the state file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentState {
    /// State file version
    pub version: u32,

    /// Request id of the tracked deployment
    pub id: Option<String>,

    /// Record of the last successful read
    pub deployment: Option<DeploymentRecord>,
}

impl Default for DeploymentState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            id: None,
            deployment: None,
        }
    }
}

/// What applying a read outcome did to the state file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Recorded,
    Cleared,
    Unchanged,
}

/// Reads and writes a state file
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state, an absent file being an empty state
    pub fn load(&self) -> Result<DeploymentState> {
        if !self.path.exists() {
            return Ok(DeploymentState::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file {:?}", self.path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse state file {:?}", self.path))
    }

    /// Write the state through a temporary file so readers never see half of it
    pub fn save(&self, state: &DeploymentState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).with_context(|| format!("Failed to write {:?}", tmp))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace state file {:?}", self.path))?;

        tracing::debug!("State saved to {:?}", self.path);
        Ok(())
    }

    /// Replace the stored record
    pub fn record(&self, record: &DeploymentRecord) -> Result<()> {
        self.save(&DeploymentState {
            version: STATE_VERSION,
            id: Some(record.id.clone()),
            deployment: Some(record.clone()),
        })
    }

    /// Forget the tracked deployment
    pub fn clear_identifier(&self) -> Result<()> {
        tracing::info!("Clearing deployment id from {:?}", self.path);
        self.save(&DeploymentState::default())
    }

    /// Persist the outcome of a read
    ///
    /// Errors leave the file untouched, except those meaning the deployment no
    /// longer exists.
    pub fn apply(&self, outcome: &ReadResult<DeploymentRecord>) -> Result<StateChange> {
        match outcome {
            Ok(record) => {
                self.record(record)?;
                Ok(StateChange::Recorded)
            }
            Err(e) if e.clears_identifier() => {
                self.clear_identifier()?;
                Ok(StateChange::Cleared)
            }
            Err(_) => Ok(StateChange::Unchanged),
        }
    }
}
