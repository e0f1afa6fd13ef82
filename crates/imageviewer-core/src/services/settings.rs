//! Application settings service
//!
//! Reads, saves and resets the settings file.

use std::fs;
use std::path::PathBuf;

use crate::models::AppSettings;
use crate::paths::PathProvider;
use crate::utils::error::AppError;

/// Settings manager
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Create a settings manager for the provider's settings path.
    pub fn new(provider: &dyn PathProvider) -> Result<Self, AppError> {
        Self::from_path(provider.settings_path())
    }

    /// Create a settings manager for an explicit file.
    pub fn from_path(settings_path: PathBuf) -> Result<Self, AppError> {
        if let Some(parent) = settings_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Config(format!("cannot create config directory: {}", e)))?;
        }

        Ok(Self { settings_path })
    }

    /// Load settings, falling back to defaults when the file does not exist.
    pub fn load(&self) -> Result<AppSettings, AppError> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Ok(AppSettings::default());
        }

        let content = fs::read_to_string(&self.settings_path)
            .map_err(|e| AppError::Config(format!("cannot read settings file: {}", e)))?;

        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("malformed settings file: {}", e)))?;

        tracing::info!("Settings loaded: {:?}", self.settings_path);
        Ok(settings)
    }

    pub fn save(&self, settings: &AppSettings) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Config(format!("cannot serialize settings: {}", e)))?;

        fs::write(&self.settings_path, content)
            .map_err(|e| AppError::Config(format!("cannot save settings file: {}", e)))?;

        tracing::info!("Settings saved: {:?}", self.settings_path);
        Ok(())
    }

    /// Reset to defaults and persist them.
    pub fn reset(&self) -> Result<AppSettings, AppError> {
        let default_settings = AppSettings::default();
        self.save(&default_settings)?;
        Ok(default_settings)
    }

    pub fn path(&self) -> &PathBuf {
        &self.settings_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::AppPathProvider;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.operations.jpeg_quality, 85);
        assert_eq!(settings.operations.drain_timeout_ms, 0);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"operations":{"jpegQuality":70}}"#).unwrap();
        assert_eq!(settings.operations.jpeg_quality, 70);
        assert_eq!(settings.operations.drain_timeout_ms, 0);
        assert!(settings.logging.file_logging);
    }

    #[test]
    fn test_settings_manager_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let provider = AppPathProvider::with_base_dir(tmp.path().to_path_buf());
        let manager = SettingsManager::new(&provider).unwrap();

        let mut settings = manager.load().unwrap();
        assert_eq!(settings, AppSettings::default());

        settings.operations.jpeg_quality = 92;
        manager.save(&settings).unwrap();
        assert_eq!(manager.load().unwrap().operations.jpeg_quality, 92);

        let reset = manager.reset().unwrap();
        assert_eq!(reset, AppSettings::default());
        assert_eq!(manager.load().unwrap(), AppSettings::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ nope").unwrap();

        let manager = SettingsManager::from_path(path).unwrap();
        assert!(matches!(manager.load(), Err(AppError::Config(_))));
    }
}
