//! User display preferences and the local key/value store they persist to.
//!
//! The settings screen keeps one [`PreferenceSet`] in memory and writes it
//! through to a [`KeyValueStore`] under [`PREFERENCES_KEY`] after every change.

mod model;
mod store;

pub use model::{ColorChoice, PreferenceChange, PreferenceSet};
pub use store::{KeyValueStore, PREFERENCES_KEY};
