pub mod error;
pub mod json_settings_repository;
pub mod settings_repository;

pub use error::{RepositoryError, RepositoryResult};
pub use json_settings_repository::JsonSettingsRepository;
pub use settings_repository::{Settings, SettingsRepository};
