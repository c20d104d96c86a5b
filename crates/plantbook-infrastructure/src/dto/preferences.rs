//! PreferenceSet DTOs and migrations
//!
//! Preferences are stored as one JSON string under a single key. Current
//! writes produce a versioned, field-named record; the positional array
//! written by earlier installs is still accepted on read.

use serde::{Deserialize, Serialize};
use version_migrate::{IntoDomain, Versioned};

use plantbook_core::error::{PlantbookError, Result};
use plantbook_core::preferences::PreferenceSet;

const ENTITY: &str = "preference_set";

/// Preference record V1.0.0 (initial versioned schema).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSetV1_0 {
    #[serde(default)]
    pub want_vegetables: bool,
    #[serde(default)]
    pub want_edible: bool,
    #[serde(default)]
    pub flower_color: String,
    #[serde(default)]
    pub fruit_color: String,
}

/// Type alias for the latest PreferenceSet version.
pub type PreferenceSetDTO = PreferenceSetV1_0;

impl Default for PreferenceSetV1_0 {
    fn default() -> Self {
        Self {
            want_vegetables: false,
            want_edible: false,
            flower_color: String::new(),
            fruit_color: String::new(),
        }
    }
}

/// Unversioned positional encoding: `[wantVegetables, wantEdible, flowerColor, fruitColor]`.
///
/// Order is load-bearing. Only ever decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyPreferenceArray(pub bool, pub bool, pub String, pub String);

impl From<LegacyPreferenceArray> for PreferenceSet {
    fn from(legacy: LegacyPreferenceArray) -> Self {
        PreferenceSet {
            want_vegetables: legacy.0,
            want_edible: legacy.1,
            flower_color: legacy.2,
            fruit_color: legacy.3,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

/// Convert PreferenceSetV1_0 DTO to domain model.
impl IntoDomain<PreferenceSet> for PreferenceSetV1_0 {
    fn into_domain(self) -> PreferenceSet {
        PreferenceSet {
            want_vegetables: self.want_vegetables,
            want_edible: self.want_edible,
            flower_color: self.flower_color,
            fruit_color: self.fruit_color,
        }
    }
}

/// Convert domain model to PreferenceSetV1_0 DTO for persistence.
impl version_migrate::FromDomain<PreferenceSet> for PreferenceSetV1_0 {
    fn from_domain(prefs: PreferenceSet) -> Self {
        PreferenceSetV1_0 {
            want_vegetables: prefs.want_vegetables,
            want_edible: prefs.want_edible,
            flower_color: prefs.flower_color,
            fruit_color: prefs.fruit_color,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for PreferenceSet entities.
///
/// # Migration Path
///
/// - V1.0 → PreferenceSet: Converts DTO to domain model
pub fn create_preferences_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    let preferences_path = version_migrate::Migrator::define(ENTITY)
        .from::<PreferenceSetV1_0>()
        .into_with_save::<PreferenceSet>();

    migrator
        .register(preferences_path)
        .expect("Failed to register preference_set migration path");

    migrator
}

/// Serializes preferences into the stored string (latest versioned record).
pub fn encode_preferences(
    migrator: &version_migrate::Migrator,
    prefs: &PreferenceSet,
) -> Result<String> {
    migrator
        .save_domain_flat(ENTITY, prefs.clone())
        .map_err(|e| PlantbookError::Serialization {
            format: "JSON".to_string(),
            message: format!("Failed to serialize preferences: {}", e),
        })
}

/// Parses a stored string into preferences.
///
/// Accepts the versioned record and the legacy positional array.
pub fn decode_preferences(
    migrator: &version_migrate::Migrator,
    raw: &str,
) -> Result<PreferenceSet> {
    let json_value: serde_json::Value = serde_json::from_str(raw)?;

    match json_value {
        serde_json::Value::Array(_) => {
            let legacy: LegacyPreferenceArray = serde_json::from_value(json_value)?;
            Ok(legacy.into())
        }
        serde_json::Value::Object(_) => migrator
            .load_flat_from(ENTITY, json_value)
            .map_err(|e| PlantbookError::migration(format!("Failed to migrate preferences: {}", e))),
        other => Err(PlantbookError::Serialization {
            format: "JSON".to_string(),
            message: format!("Unexpected preferences value: {}", other),
        }),
    }
}
