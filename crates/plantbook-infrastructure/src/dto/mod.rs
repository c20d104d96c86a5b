//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema for persisting data.
//! They are private to the infrastructure layer and handle the evolution
//! of the storage format over time.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//!
//! ### PreferenceSet Version History
//! - **legacy**: unversioned positional array `[vegetables, edible, flower, fruit]`
//!   (read-only, never written)
//! - **1.0.0**: field-named camelCase record with a `version` tag

mod preferences;

pub use preferences::{
    LegacyPreferenceArray, PreferenceSetDTO, PreferenceSetV1_0, create_preferences_migrator,
    decode_preferences, encode_preferences,
};
