pub mod config;
pub mod detail;
pub mod error;
pub mod listing;
pub mod navigation;
pub mod plant;
pub mod preferences;

// Re-export common error type
pub use error::{PlantbookError, Result};
