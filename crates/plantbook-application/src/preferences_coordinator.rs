//! Settings screen controller.
//!
//! Owns the in-memory [`PreferenceSet`] and writes it through to the local
//! key/value store after every change.

use std::sync::Arc;
use tokio::sync::Mutex;

use plantbook_core::error::Result;
use plantbook_core::preferences::{KeyValueStore, PREFERENCES_KEY, PreferenceChange, PreferenceSet};
use plantbook_infrastructure::dto::{
    create_preferences_migrator, decode_preferences, encode_preferences,
};

/// Result of [`PreferencesCoordinator::load_preferences`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferencesLoad {
    /// A stored record was found and applied.
    Restored(PreferenceSet),
    /// Nothing stored yet; defaults kept.
    Missing,
    /// The store failed or held something undecodable; state unchanged.
    Unreadable(String),
}

/// Coordinates preference state between the settings screen and the store.
///
/// The lock is held across the store write, so each write is built from the
/// latest sibling values even when several changes race.
pub struct PreferencesCoordinator {
    state: Mutex<PreferenceSet>,
    store: Arc<dyn KeyValueStore>,
    migrator: version_migrate::Migrator,
}

impl PreferencesCoordinator {
    /// Creates a coordinator with default preferences.
    ///
    /// Call [`load_preferences`](Self::load_preferences) once on activation.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: Mutex::new(PreferenceSet::default()),
            store,
            migrator: create_preferences_migrator(),
        }
    }

    /// Returns a snapshot of the in-memory preferences.
    pub async fn current(&self) -> PreferenceSet {
        self.state.lock().await.clone()
    }

    pub async fn toggle_vegetables(&self, value: bool) -> PreferenceSet {
        self.update(PreferenceChange::Vegetables(value)).await
    }

    pub async fn toggle_edible(&self, value: bool) -> PreferenceSet {
        self.update(PreferenceChange::Edible(value)).await
    }

    pub async fn set_flower_color(&self, color: impl Into<String>) -> PreferenceSet {
        self.update(PreferenceChange::FlowerColor(color.into())).await
    }

    pub async fn set_fruit_color(&self, color: impl Into<String>) -> PreferenceSet {
        self.update(PreferenceChange::FruitColor(color.into())).await
    }

    /// Applies one change, then performs exactly one store write.
    ///
    /// A failed write is logged; the in-memory update stays.
    async fn update(&self, change: PreferenceChange) -> PreferenceSet {
        let mut state = self.state.lock().await;
        let next = state.apply(change);
        *state = next.clone();

        tracing::debug!("[Preferences] Updated in memory: {:?}", next);

        if let Err(e) = self.persist(&next).await {
            tracing::error!("[Preferences] Failed to persist preferences: {}", e);
        }

        next
    }

    async fn persist(&self, prefs: &PreferenceSet) -> Result<()> {
        let raw = encode_preferences(&self.migrator, prefs)?;
        self.store.set_item(PREFERENCES_KEY, &raw).await
    }

    /// Reads the stored record and applies all four fields from it.
    ///
    /// Never fails: store and decode errors are logged and leave the
    /// in-memory state untouched.
    pub async fn load_preferences(&self) -> PreferencesLoad {
        let raw = match self.store.get_item(PREFERENCES_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!("[Preferences] No stored preferences, keeping defaults");
                return PreferencesLoad::Missing;
            }
            Err(e) => {
                tracing::error!("[Preferences] Failed to read preferences: {}", e);
                return PreferencesLoad::Unreadable(e.to_string());
            }
        };

        let loaded = match decode_preferences(&self.migrator, &raw) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::error!("[Preferences] Stored preferences are unreadable: {}", e);
                return PreferencesLoad::Unreadable(e.to_string());
            }
        };

        let mut state = self.state.lock().await;
        *state = loaded.clone();
        tracing::info!("[Preferences] Restored preferences: {:?}", loaded);

        PreferencesLoad::Restored(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use plantbook_core::error::PlantbookError;
    use plantbook_infrastructure::InMemoryKeyValueStore;
    use std::sync::Mutex as StdMutex;

    /// Records every write and can be told to fail.
    #[derive(Default)]
    struct RecordingStore {
        writes: StdMutex<Vec<(String, String)>>,
        stored: StdMutex<Option<String>>,
        fail_writes: bool,
        fail_reads: bool,
    }

    #[async_trait]
    impl KeyValueStore for RecordingStore {
        async fn set_item(&self, key: &str, value: &str) -> Result<()> {
            self.writes
                .lock()
                .unwrap()
                .push((key.to_string(), value.to_string()));
            if self.fail_writes {
                return Err(PlantbookError::data_access("disk full"));
            }
            *self.stored.lock().unwrap() = Some(value.to_string());
            Ok(())
        }

        async fn get_item(&self, _key: &str) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(PlantbookError::data_access("store unavailable"));
            }
            Ok(self.stored.lock().unwrap().clone())
        }
    }

    fn decode(raw: &str) -> PreferenceSet {
        decode_preferences(&create_preferences_migrator(), raw).unwrap()
    }

    #[tokio::test]
    async fn test_each_setter_writes_once_with_siblings_kept() {
        let store = Arc::new(RecordingStore::default());
        let coordinator = PreferencesCoordinator::new(store.clone());

        coordinator.toggle_vegetables(true).await;
        coordinator.set_flower_color("red").await;
        coordinator.toggle_edible(true).await;
        coordinator.set_fruit_color("blue").await;

        let writes = store.writes.lock().unwrap().clone();
        assert_eq!(writes.len(), 4);
        assert!(writes.iter().all(|(key, _)| key == PREFERENCES_KEY));

        assert_eq!(
            decode(&writes[0].1),
            PreferenceSet {
                want_vegetables: true,
                ..Default::default()
            }
        );
        assert_eq!(
            decode(&writes[1].1),
            PreferenceSet {
                want_vegetables: true,
                flower_color: "red".to_string(),
                ..Default::default()
            }
        );
        assert_eq!(
            decode(&writes[2].1),
            PreferenceSet {
                want_vegetables: true,
                want_edible: true,
                flower_color: "red".to_string(),
                ..Default::default()
            }
        );
        assert_eq!(
            decode(&writes[3].1),
            PreferenceSet {
                want_vegetables: true,
                want_edible: true,
                flower_color: "red".to_string(),
                fruit_color: "blue".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_update() {
        let store = Arc::new(RecordingStore {
            fail_writes: true,
            ..Default::default()
        });
        let coordinator = PreferencesCoordinator::new(store.clone());

        let prefs = coordinator.toggle_edible(true).await;
        assert!(prefs.want_edible);
        assert!(coordinator.current().await.want_edible);
        assert_eq!(store.writes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_legacy_positional_record() {
        let store = Arc::new(InMemoryKeyValueStore::with_items([(
            PREFERENCES_KEY,
            r#"[true,false,"red","blue"]"#,
        )]));
        let coordinator = PreferencesCoordinator::new(store);

        let outcome = coordinator.load_preferences().await;
        let expected = PreferenceSet {
            want_vegetables: true,
            want_edible: false,
            flower_color: "red".to_string(),
            fruit_color: "blue".to_string(),
        };
        assert_eq!(outcome, PreferencesLoad::Restored(expected.clone()));
        assert_eq!(coordinator.current().await, expected);
    }

    #[tokio::test]
    async fn test_load_missing_keeps_defaults() {
        let coordinator = PreferencesCoordinator::new(Arc::new(InMemoryKeyValueStore::new()));
        assert_eq!(coordinator.load_preferences().await, PreferencesLoad::Missing);
        assert_eq!(coordinator.current().await, PreferenceSet::default());
    }

    #[tokio::test]
    async fn test_load_malformed_leaves_state_unchanged() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let coordinator = PreferencesCoordinator::new(store.clone());
        coordinator.set_flower_color("yellow").await;

        store.set_item(PREFERENCES_KEY, "definitely not json").await.unwrap();

        let outcome = coordinator.load_preferences().await;
        assert!(matches!(outcome, PreferencesLoad::Unreadable(_)));
        assert_eq!(coordinator.current().await.flower_color, "yellow");
    }

    #[tokio::test]
    async fn test_load_read_failure_is_swallowed() {
        let store = Arc::new(RecordingStore {
            fail_reads: true,
            ..Default::default()
        });
        let coordinator = PreferencesCoordinator::new(store);
        let outcome = coordinator.load_preferences().await;
        assert!(matches!(outcome, PreferencesLoad::Unreadable(msg) if msg.contains("store unavailable")));
        assert_eq!(coordinator.current().await, PreferenceSet::default());
    }
}
