//! Application wiring: configuration, collaborators and the two controllers.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use plantbook_application::{ListingFlow, PreferencesCoordinator};
use plantbook_core::config::RootConfig;
use plantbook_core::preferences::KeyValueStore;
use plantbook_infrastructure::{
    ConfigService, FileKeyValueStore, InMemoryKeyValueStore, PlantbookPaths, TrefleLookupClient,
    expand_home,
};

/// Options from the global command-line flags.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub config: Option<PathBuf>,
    pub ephemeral: bool,
}

/// Everything a command needs.
pub struct AppContext {
    pub listing: Arc<ListingFlow>,
    pub preferences: PreferencesCoordinator,
    pub config: RootConfig,
}

impl AppContext {
    /// Loads configuration and builds the controllers.
    pub async fn bootstrap(paths: &PlantbookPaths, options: &AppOptions) -> Result<Self> {
        let config_service = match &options.config {
            Some(path) => ConfigService::with_path(expand_home(path)?),
            None => ConfigService::new(paths)?,
        };
        let config = config_service.get_config().await.with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_service.config_path().display()
            )
        })?;

        if config.api.token.trim().is_empty() {
            tracing::warn!(
                "[Bootstrap] No API token configured; set api.token in {} or PLANTBOOK_API_TOKEN",
                config_service.config_path().display()
            );
        }

        let store = build_store(paths, &config, options.ephemeral)?;
        let lookup = TrefleLookupClient::from_config(&config.api)
            .context("Failed to create plant lookup client")?;

        Ok(Self {
            listing: Arc::new(ListingFlow::new(Arc::new(lookup))),
            preferences: PreferencesCoordinator::new(store),
            config,
        })
    }
}

fn build_store(
    paths: &PlantbookPaths,
    config: &RootConfig,
    ephemeral: bool,
) -> Result<Arc<dyn KeyValueStore>> {
    if ephemeral {
        tracing::info!("[Bootstrap] Using in-memory preference store");
        return Ok(Arc::new(InMemoryKeyValueStore::new()));
    }

    let path = match &config.storage.preferences_file {
        Some(path) => expand_home(path)?,
        None => paths.preferences_file()?,
    };
    tracing::info!("[Bootstrap] Preference store: {}", path.display());
    Ok(Arc::new(FileKeyValueStore::new(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantbook_core::config::DEFAULT_API_BASE_URL;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_bootstrap_writes_default_config_under_base() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlantbookPaths::new(Some(temp_dir.path().to_path_buf()));

        let app = AppContext::bootstrap(&paths, &AppOptions::default())
            .await
            .unwrap();

        assert!(paths.config_file().unwrap().exists());
        assert_eq!(app.config.api.base_url, DEFAULT_API_BASE_URL);
    }

    #[tokio::test]
    async fn test_storage_override_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlantbookPaths::new(Some(temp_dir.path().to_path_buf()));
        let prefs_file = temp_dir.path().join("elsewhere").join("prefs.json");
        std::fs::write(
            paths.config_file().unwrap(),
            format!(
                "[storage]\npreferences_file = \"{}\"\n",
                prefs_file.display()
            ),
        )
        .unwrap();

        let app = AppContext::bootstrap(&paths, &AppOptions::default())
            .await
            .unwrap();
        app.preferences.toggle_edible(true).await;

        assert!(prefs_file.exists());
        assert!(!paths.preferences_file().unwrap().exists());
    }

    #[tokio::test]
    async fn test_ephemeral_store_leaves_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlantbookPaths::new(Some(temp_dir.path().to_path_buf()));
        let options = AppOptions {
            config: None,
            ephemeral: true,
        };

        let app = AppContext::bootstrap(&paths, &options).await.unwrap();
        app.preferences.toggle_vegetables(true).await;

        assert!(!paths.preferences_file().unwrap().exists());
    }
}
