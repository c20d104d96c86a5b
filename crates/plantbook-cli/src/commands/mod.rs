pub mod listing;
pub mod settings;
