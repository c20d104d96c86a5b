//! Configuration service implementation.
//!
//! Loads the root configuration from config.toml (see [`PlantbookPaths`]),
//! writes a default file on first run, and caches the result.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

use crate::paths::PlantbookPaths;
use plantbook_core::config::RootConfig;
use plantbook_core::error::{PlantbookError, Result};

/// Environment variable that overrides `api.token`.
pub const API_TOKEN_ENV: &str = "PLANTBOOK_API_TOKEN";

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    config_path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the config.toml resolved by `paths`.
    pub fn new(paths: &PlantbookPaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    /// Creates a service reading an explicit config file.
    pub fn with_path(config_path: PathBuf) -> Self {
        Self {
            config_path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// The `PLANTBOOK_API_TOKEN` environment variable, when set and non-empty,
    /// replaces the configured token.
    pub async fn get_config(&self) -> Result<RootConfig> {
        {
            let cached = self.config.read().await;
            if let Some(ref config) = *cached {
                return Ok(config.clone());
            }
        }

        let mut loaded = self.load_or_create().await?;
        if let Ok(token) = std::env::var(API_TOKEN_ENV) {
            if !token.trim().is_empty() {
                tracing::debug!("[ConfigService] Using API token from {}", API_TOKEN_ENV);
                loaded.api.token = token;
            }
        }

        let mut cached = self.config.write().await;
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub async fn invalidate_cache(&self) {
        let mut cached = self.config.write().await;
        *cached = None;
    }

    async fn load_or_create(&self) -> Result<RootConfig> {
        if !fs::try_exists(&self.config_path).await? {
            let default_config = RootConfig::default();
            if let Err(e) = self.write_default(&default_config).await {
                // A read-only config dir must not keep the app from starting
                tracing::warn!(
                    "[ConfigService] Could not write default config to {}: {}",
                    self.config_path.display(),
                    e
                );
            } else {
                tracing::info!(
                    "[ConfigService] Created default config at {}",
                    self.config_path.display()
                );
            }
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path).await.map_err(|e| {
            PlantbookError::io(format!(
                "Failed to read config '{}': {}",
                self.config_path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            PlantbookError::config(format!(
                "Failed to parse config '{}': {}",
                self.config_path.display(),
                e
            ))
        })
    }

    async fn write_default(&self, config: &RootConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantbook_core::config::DEFAULT_API_BASE_URL;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_config_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlantbookPaths::new(Some(temp_dir.path().to_path_buf()));
        let service = ConfigService::new(&paths).unwrap();

        let config = service.get_config().await.unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert!(temp_dir.path().join("config.toml").exists());
    }

    #[tokio::test]
    async fn test_reads_existing_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "http://localhost:9999"
timeout_secs = 5

[storage]
preferences_file = "/tmp/custom-prefs.json"
"#,
        )
        .unwrap();

        let service = ConfigService::with_path(path);
        let config = service.get_config().await.unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9999");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(
            config.storage.preferences_file,
            Some(PathBuf::from("/tmp/custom-prefs.json"))
        );
    }

    #[tokio::test]
    async fn test_invalid_config_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let service = ConfigService::with_path(path);
        let err = service.get_config().await.unwrap_err();
        assert!(matches!(err, PlantbookError::Config(_)));
    }
}
