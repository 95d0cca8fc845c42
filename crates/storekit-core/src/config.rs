//! Configuration management
//!
//! Settings are layered: built-in defaults, then `settings.toml` in the
//! storekit home directory, then `STOREKIT_*` environment variables.

use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings file name inside the storekit home directory
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Prefix for environment overrides, e.g. `STOREKIT_REDIS_URL`
pub const ENV_PREFIX: &str = "STOREKIT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub redis_url: String,
    pub mongo_uri: String,
    pub logs_database: String,
    pub logs_collection: String,
    pub schools_database: String,
    pub schools_collection: String,
    /// Lifetime of a cached page
    pub page_ttl_secs: u64,
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            mongo_uri: "mongodb://127.0.0.1:27017".to_string(),
            logs_database: "logs".to_string(),
            logs_collection: "nginx".to_string(),
            schools_database: "my_db".to_string(),
            schools_collection: "school".to_string(),
            page_ttl_secs: 10,
            http_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn page_ttl(&self) -> Duration {
        Duration::from_secs(self.page_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

pub struct SettingsManager;

impl SettingsManager {
    /// Get the storekit home directory (~/.storekit)
    pub fn home() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("STOREKIT_HOME") {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir()
            .ok_or_else(|| StoreError::Config("Could not find home directory".to_string()))?;
        Ok(home.join(".storekit"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::home()?.join(SETTINGS_FILE_NAME))
    }

    /// Load settings from the default location
    pub fn load() -> Result<Settings> {
        Self::load_from(&Self::settings_path()?)
    }

    /// Load settings with `path` as the file layer. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Settings> {
        tracing::debug!("Loading settings from {}", path.display());

        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&Settings::default())?)
            .add_source(
                ::config::File::from(path.to_path_buf())
                    .format(::config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(settings)
    }

    /// Save settings to the default location
    pub fn save(settings: &Settings) -> Result<PathBuf> {
        let path = Self::settings_path()?;
        Self::save_to(settings, &path)?;
        Ok(path)
    }

    pub fn save_to(settings: &Settings, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(settings)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let settings = SettingsManager::load_from(&dir.path().join(SETTINGS_FILE_NAME))?;

        assert_eq!(settings.logs_database, "logs");
        assert_eq!(settings.logs_collection, "nginx");
        assert_eq!(settings.page_ttl(), Duration::from_secs(10));
        Ok(())
    }

    #[test]
    fn test_file_overrides_defaults() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "mongo_uri = \"mongodb://db.internal:27017\"\npage_ttl_secs = 3\n")?;

        let settings = SettingsManager::load_from(&path)?;
        assert_eq!(settings.mongo_uri, "mongodb://db.internal:27017");
        assert_eq!(settings.page_ttl_secs, 3);
        assert_eq!(settings.schools_collection, "school");
        Ok(())
    }

    #[test]
    fn test_save_then_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);

        let settings = Settings {
            schools_database: "holberton".to_string(),
            ..Settings::default()
        };
        SettingsManager::save_to(&settings, &path)?;

        assert_eq!(SettingsManager::load_from(&path)?.schools_database, "holberton");
        Ok(())
    }
}
