use std::path::PathBuf;

use super::error::{RepositoryError, RepositoryResult};
use super::settings_repository::{Settings, SettingsRepository};
use crate::services::backend::BoxFuture;

pub struct JsonSettingsRepository {
    file_path: PathBuf,
}

impl JsonSettingsRepository {
    /// Create repository with XDG-compliant path
    pub fn new() -> RepositoryResult<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| RepositoryError::PathError {
            message: "Cannot determine config directory".into(),
        })?;

        let file_path = config_dir.join("atrium").join("settings.json");
        Ok(Self { file_path })
    }

    /// Create repository with custom path (for testing)
    pub fn with_path(file_path: PathBuf) -> Self {
        Self { file_path }
    }
}

impl SettingsRepository for JsonSettingsRepository {
    fn load(&self) -> BoxFuture<'static, RepositoryResult<Settings>> {
        let path = self.file_path.clone();

        Box::pin(async move {
            // If the file doesn't exist, return defaults (first run)
            if !path.exists() {
                return Ok(Settings::default());
            }

            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(RepositoryError::IoError)?;

            let settings: Settings =
                serde_json::from_str(&contents).map_err(RepositoryError::SerializationError)?;

            Ok(settings)
        })
    }

    fn save(&self, settings: Settings) -> BoxFuture<'static, RepositoryResult<()>> {
        let path = self.file_path.clone();

        Box::pin(async move {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(RepositoryError::IoError)?;
            }

            let json = serde_json::to_string_pretty(&settings)
                .map_err(RepositoryError::SerializationError)?;

            // Write atomically using temp file + rename
            let temp_path = path.with_extension("json.tmp");
            tokio::fs::write(&temp_path, json)
                .await
                .map_err(RepositoryError::IoError)?;

            tokio::fs::rename(&temp_path, &path)
                .await
                .map_err(RepositoryError::IoError)?;

            Ok(())
        })
    }

    fn storage_path(&self) -> String {
        self.file_path.to_string_lossy().to_string()
    }
}
