//! Unified path management for plantbook files.
//!
//! Platform directories are resolved via AppPaths from the version-migrate
//! crate. A base directory override keeps tests and portable installs out of
//! the user's real config directory.
//!
//! ```text
//! ~/.config/plantbook/         # Config directory
//! ├── config.toml              # Application configuration
//! └── preferences.json         # Key/value preference store
//!
//! ~/.local/share/plantbook/    # Data directory
//! └── logs/                    # Application logs
//!     └── plantbook.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};
use version_migrate::AppPaths;

const APP_NAME: &str = "plantbook";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for plantbook_core::PlantbookError {
    fn from(err: PathError) -> Self {
        plantbook_core::PlantbookError::config(err.to_string())
    }
}

/// Resolves where plantbook keeps its files.
#[derive(Debug, Clone, Default)]
pub struct PlantbookPaths {
    base_override: Option<PathBuf>,
}

impl PlantbookPaths {
    /// Creates a resolver. With `Some(base)`, every path lives under `base`.
    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    fn app_paths() -> AppPaths {
        AppPaths::new(APP_NAME)
    }

    /// Returns the configuration directory (e.g. `~/.config/plantbook/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_override {
            Some(base) => Ok(base.clone()),
            None => Self::app_paths()
                .config_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (e.g. `~/.local/share/plantbook/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_override {
            Some(base) => Ok(base.join("data")),
            None => Self::app_paths()
                .data_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    /// Returns the path to config.toml.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path of the file-backed key/value store.
    pub fn preferences_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("preferences.json"))
    }

    /// Returns the log directory.
    pub fn log_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}

/// Expands a leading `~/` in a user-supplied path to the home directory.
///
/// Paths without the prefix are returned unchanged.
pub fn expand_home(path: &Path) -> Result<PathBuf, PathError> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        let path = PathBuf::from("/etc/plantbook/config.toml");
        assert_eq!(expand_home(&path).unwrap(), path);
    }

    #[test]
    fn test_expand_home_replaces_tilde() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let expanded = expand_home(Path::new("~/plants/prefs.json")).unwrap();
        assert_eq!(expanded, home.join("plants/prefs.json"));
    }

    #[test]
    fn test_override_places_everything_under_base() {
        let paths = PlantbookPaths::new(Some(PathBuf::from("/tmp/pb")));
        assert_eq!(paths.config_file().unwrap(), PathBuf::from("/tmp/pb/config.toml"));
        assert_eq!(
            paths.preferences_file().unwrap(),
            PathBuf::from("/tmp/pb/preferences.json")
        );
        assert_eq!(paths.log_dir().unwrap(), PathBuf::from("/tmp/pb/data/logs"));
    }
}
