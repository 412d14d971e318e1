//! Local state store
//!
//! Persists deployment state in `.camunda/state.json`, keeping the previous
//! file as `state.json.backup`.

use anyhow::{Context, bail};
use camunda_provider::DeploymentModel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".camunda";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";

/// All tracked deployments, keyed by deployment key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    pub deployments: BTreeMap<String, DeploymentRecord>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            deployments: BTreeMap::new(),
        }
    }
}

impl StateFile {
    pub fn get(&self, key: &str) -> Option<&DeploymentRecord> {
        self.deployments.get(key)
    }

    /// Record `state` under its key, keeping the original creation time
    pub fn set(&mut self, state: DeploymentModel) {
        let now = Utc::now();
        let created_at = self
            .deployments
            .get(&state.key)
            .map(|r| r.created_at)
            .unwrap_or(now);

        self.deployments.insert(
            state.key.clone(),
            DeploymentRecord {
                state,
                created_at,
                updated_at: now,
            },
        );
        self.updated_at = now;
    }

    pub fn remove(&mut self, key: &str) -> Option<DeploymentRecord> {
        let removed = self.deployments.remove(key);
        if removed.is_some() {
            self.updated_at = Utc::now();
        }
        removed
    }
}

/// A single tracked deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub state: DeploymentModel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reads and writes the state file under a project root
pub struct StateManager {
    root: PathBuf,
}

impl StateManager {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_dir().join(STATE_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.state_dir().join(STATE_BACKUP)
    }

    pub async fn load(&self) -> anyhow::Result<StateFile> {
        let path = self.state_path();
        if !path.exists() {
            tracing::debug!("State file not found, starting empty");
            return Ok(StateFile::default());
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let state: StateFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if state.version > STATE_VERSION {
            bail!(
                "State file version {} is newer than supported version {}",
                state.version,
                STATE_VERSION
            );
        }

        tracing::debug!("Loaded state with {} deployments", state.deployments.len());
        Ok(state)
    }

    pub async fn save(&self, state: &StateFile) -> anyhow::Result<()> {
        let dir = self.state_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
        }

        let path = self.state_path();
        if path.exists() {
            fs::copy(&path, self.backup_path()).await?;
        }

        let content = serde_json::to_string_pretty(state)?;
        fs::write(&path, content)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        tracing::debug!("Saved state with {} deployments", state.deployments.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn orders(id: &str) -> DeploymentModel {
        let mut model =
            DeploymentModel::new("orders-process").with_resource("orders.bpmn", "<xml/>");
        model.id = Some(id.to_string());
        model
    }

    #[tokio::test]
    async fn test_empty_state() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let state = manager.load().await.unwrap();
        assert!(state.deployments.is_empty());
        assert_eq!(state.version, STATE_VERSION);
    }

    #[tokio::test]
    async fn test_save_load_roundtrip_with_backup() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut state = StateFile::default();
        state.set(orders("dep-1"));
        manager.save(&state).await.unwrap();
        assert!(!temp_dir.path().join(".camunda/state.json.backup").exists());

        state.set(orders("dep-2"));
        manager.save(&state).await.unwrap();
        assert!(temp_dir.path().join(".camunda/state.json.backup").exists());

        let loaded = manager.load().await.unwrap();
        let record = loaded.get("orders-process").unwrap();
        assert_eq!(record.state.id.as_deref(), Some("dep-2"));
        assert_eq!(record.state.resources.len(), 1);
    }

    #[test]
    fn test_set_keeps_created_at() {
        let mut state = StateFile::default();
        state.set(orders("dep-1"));
        let created = state.get("orders-process").unwrap().created_at;

        state.set(orders("dep-2"));
        let record = state.get("orders-process").unwrap();
        assert_eq!(record.created_at, created);
        assert!(record.updated_at >= created);
    }

    #[test]
    fn test_remove() {
        let mut state = StateFile::default();
        state.set(orders("dep-1"));
        assert!(state.remove("orders-process").is_some());
        assert!(state.remove("orders-process").is_none());
        assert!(state.deployments.is_empty());
    }

    #[tokio::test]
    async fn test_newer_version_is_rejected() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let state = StateFile {
            version: STATE_VERSION + 1,
            ..Default::default()
        };
        manager.save(&state).await.unwrap();

        let err = manager.load().await.unwrap_err();
        assert!(err.to_string().contains("newer than supported"));
    }
}
