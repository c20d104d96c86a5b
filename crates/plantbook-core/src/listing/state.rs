use serde::{Deserialize, Serialize};

use crate::plant::PlantRecord;

/// Arguments of one listing load.
///
/// A non-empty `search_term` wins over `filter_token`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub search_term: String,
    pub filter_token: String,
}

impl LoadRequest {
    /// The unfiltered full listing, loaded when the screen becomes active.
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            filter_token: String::new(),
        }
    }

    pub fn filtered(filter_token: impl Into<String>) -> Self {
        Self {
            search_term: String::new(),
            filter_token: filter_token.into(),
        }
    }

    /// True when this request goes to the search endpoint.
    pub fn is_search(&self) -> bool {
        !self.search_term.is_empty()
    }
}

/// What happened to the listing.
///
/// Each event carries the generation of the load it belongs to; completion
/// events for an older generation are dropped by the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEvent {
    LoadStarted { generation: u64 },
    LoadSucceeded { generation: u64, results: Vec<PlantRecord> },
    LoadFailed { generation: u64, message: String },
}

/// Listing screen state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingState {
    pub loading: bool,
    pub results: Vec<PlantRecord>,
    /// Generation of the newest load that was started.
    pub generation: u64,
    /// Message of the last failed load, cleared when a new load starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ListingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `event` and returns the next state.
    pub fn reduce(self, event: ListingEvent) -> Self {
        match event {
            ListingEvent::LoadStarted { generation } => Self {
                loading: true,
                results: Vec::new(),
                generation,
                last_error: None,
            },
            ListingEvent::LoadSucceeded {
                generation,
                results,
            } if generation == self.generation => Self {
                loading: false,
                results,
                generation,
                last_error: None,
            },
            ListingEvent::LoadFailed {
                generation,
                message,
            } if generation == self.generation => Self {
                loading: false,
                results: Vec::new(),
                generation,
                last_error: Some(message),
            },
            // Stale completion from a superseded load
            _ => self,
        }
    }

    /// True when a load has finished with nothing to show.
    pub fn is_empty(&self) -> bool {
        !self.loading && self.results.is_empty()
    }

    /// Returns the record at `index` for the detail screen.
    pub fn select(&self, index: usize) -> Option<&PlantRecord> {
        if self.loading {
            return None;
        }
        self.results.get(index)
    }
}
