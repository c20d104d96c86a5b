//! File-backed key/value store.
//!
//! All items live in one JSON object (`{"key": "value", ...}`). Every set
//! rewrites the file through a temporary sibling and an atomic rename, so a
//! crash mid-write leaves the previous contents in place.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use plantbook_core::error::{PlantbookError, Result};
use plantbook_core::preferences::KeyValueStore;

type Items = BTreeMap<String, String>;

/// Key/value store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_items(&self) -> Result<Items> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Items::new());
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            PlantbookError::io(format!(
                "Failed to read store file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(Items::new());
        }

        serde_json::from_str(&content).map_err(|e| PlantbookError::Serialization {
            format: "JSON".to_string(),
            message: format!(
                "Failed to parse store file '{}': {}",
                self.path.display(),
                e
            ),
        })
    }

    async fn save_items(&self, items: &Items) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                PlantbookError::io(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(items)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = fs::File::create(&tmp_path).await?;
        tmp_file.write_all(json.as_bytes()).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            PlantbookError::io(format!(
                "Failed to replace store file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Moves an unparsable store file to `<name>.corrupt` so it can be inspected.
    async fn set_aside_corrupt(&self) {
        let mut corrupt_name = self.path.as_os_str().to_os_string();
        corrupt_name.push(".corrupt");
        let corrupt_path = PathBuf::from(corrupt_name);

        if let Err(e) = fs::rename(&self.path, &corrupt_path).await {
            tracing::warn!(
                "[FileKeyValueStore] Failed to move {} aside: {}",
                self.path.display(),
                e
            );
        }
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| PlantbookError::io("Store path has no file name"))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        Ok(self.path.with_file_name(tmp_name))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut items = match self.load_items().await {
            Ok(items) => items,
            Err(e) if e.is_serialization() => {
                tracing::warn!(
                    "[FileKeyValueStore] Discarding unreadable store {}: {}",
                    self.path.display(),
                    e
                );
                self.set_aside_corrupt().await;
                Items::new()
            }
            Err(e) => return Err(e),
        };
        items.insert(key.to_string(), value.to_string());
        self.save_items(&items).await?;

        tracing::debug!("[FileKeyValueStore] Wrote key '{}' to {}", key, self.path.display());
        Ok(())
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.load_items().await?;
        Ok(items.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("prefs.json"));
        assert_eq!(store.get_item("preferences").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_and_get_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("prefs.json");

        let store = FileKeyValueStore::new(path.clone());
        store.set_item("preferences", r#"[true,false,"red","blue"]"#).await.unwrap();
        store.set_item("other", "x").await.unwrap();

        let reopened = FileKeyValueStore::new(path.clone());
        assert_eq!(
            reopened.get_item("preferences").await.unwrap().as_deref(),
            Some(r#"[true,false,"red","blue"]"#)
        );
        assert_eq!(reopened.get_item("other").await.unwrap().as_deref(), Some("x"));
        assert!(!path.with_file_name("prefs.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("prefs.json"));
        store.set_item("k", "1").await.unwrap();
        store.set_item("k", "2").await.unwrap();
        assert_eq!(store.get_item("k").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        std::fs::write(&path, "{{{ nope").unwrap();

        let store = FileKeyValueStore::new(path);
        let err = store.get_item("preferences").await.unwrap_err();
        assert!(err.is_serialization());
    }

    #[tokio::test]
    async fn test_set_recovers_from_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prefs.json");
        std::fs::write(&path, "{{{ nope").unwrap();

        let store = FileKeyValueStore::new(path.clone());
        store.set_item("preferences", "x").await.unwrap();
        store.set_item("preferences", "y").await.unwrap();

        assert_eq!(store.get_item("preferences").await.unwrap().as_deref(), Some("y"));
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("prefs.json.corrupt")).unwrap(),
            "{{{ nope"
        );
    }
}
