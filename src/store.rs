//! Settings persistence hook.
//!
//! The plugin calls [`SettingsStore::save`] after `!acip-enable` and
//! `!acip-disable`. Durability is owned by the host; the plugin never awaits
//! the result for correctness and a failing store cannot abort a command.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::PluginSettings;

/// Errors a settings store can surface. The plugin logs and swallows them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Host-provided persistence for the plugin settings record.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn save(&self, settings: &PluginSettings) -> Result<(), StoreError>;
}

/// Store that discards settings. Default when the host supplies none.
pub struct NoopStore;

#[async_trait]
impl SettingsStore for NoopStore {
    async fn save(&self, _settings: &PluginSettings) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Store that persists settings as pretty-printed JSON at a fixed path.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn save(&self, settings: &PluginSettings) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(settings)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
