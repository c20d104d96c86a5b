pub mod config_service;
pub mod dto;
pub mod paths;
pub mod storage;
pub mod trefle_client;

pub use crate::config_service::ConfigService;
pub use crate::paths::{PlantbookPaths, expand_home};
pub use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore};
pub use crate::trefle_client::TrefleLookupClient;
