use std::time::Duration;

use serde::{Deserialize, Serialize};

use atrium_client::{DEFAULT_BASE_URL, Language};

use crate::controllers::SyncOptions;
use crate::services::backend::BoxFuture;

use super::error::RepositoryResult;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

/// Persisted client settings. Missing fields fall back to defaults so
/// older settings files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: Language::default(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Settings {
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        }
    }
}

/// Repository trait for settings persistence
pub trait SettingsRepository: Send + Sync + 'static {
    /// Load settings; a missing file yields defaults (first run).
    fn load(&self) -> BoxFuture<'static, RepositoryResult<Settings>>;

    /// Save settings to storage
    fn save(&self, settings: Settings) -> BoxFuture<'static, RepositoryResult<()>>;

    fn storage_path(&self) -> String;
}
