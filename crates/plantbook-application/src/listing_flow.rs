//! Listing screen controller.
//!
//! Loads plant records through the lookup collaborator and keeps the
//! [`ListingState`] the listing renders from. Loads are single-flight: a new
//! load cancels the one still in flight, and a completion that arrives for an
//! older generation is dropped instead of overwriting newer results.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use plantbook_core::listing::{ListingEvent, ListingState, LoadRequest};
use plantbook_core::plant::{PlantLookup, PlantRecord};

/// How a call to [`ListingFlow::load_plants`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Results were applied to the listing.
    Loaded { generation: u64, count: usize },
    /// The lookup failed; the listing shows an empty, non-loading state.
    Failed { generation: u64, message: String },
    /// A newer load started before this one finished.
    Superseded { generation: u64 },
}

#[derive(Default)]
struct InFlight {
    generation: u64,
    cancel: Option<CancellationToken>,
}

pub struct ListingFlow {
    lookup: Arc<dyn PlantLookup>,
    state: Mutex<ListingState>,
    in_flight: Mutex<InFlight>,
}

impl ListingFlow {
    pub fn new(lookup: Arc<dyn PlantLookup>) -> Self {
        Self {
            lookup,
            state: Mutex::new(ListingState::new()),
            in_flight: Mutex::new(InFlight::default()),
        }
    }

    /// Initial load when the listing screen becomes active: the unfiltered list.
    pub async fn activate(&self) -> LoadOutcome {
        self.load_plants("", "").await
    }

    /// Search input submission. No minimum length, no debounce.
    pub async fn on_search_submit(&self, term: &str) -> LoadOutcome {
        self.load_plants(term, "").await
    }

    /// Loads plants and replaces the listing.
    ///
    /// Sets `loading` and clears results before the request goes out. A
    /// non-empty `search_term` searches; otherwise the list endpoint is called
    /// with `filter_token` (empty means unfiltered). Exactly one request is made.
    pub async fn load_plants(&self, search_term: &str, filter_token: &str) -> LoadOutcome {
        let request = LoadRequest {
            search_term: search_term.to_string(),
            filter_token: filter_token.to_string(),
        };
        self.load(request).await
    }

    /// Same as [`load_plants`](Self::load_plants) with a prepared request.
    pub async fn load(&self, request: LoadRequest) -> LoadOutcome {
        let (generation, cancel) = self.begin().await;

        tracing::info!(
            "[ListingFlow] Load #{} started ({})",
            generation,
            describe(&request)
        );

        let fetch = async {
            if request.is_search() {
                self.lookup.search_plants(&request.search_term).await
            } else {
                self.lookup.list_plants(&request.filter_token).await
            }
        };

        let result = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("[ListingFlow] Load #{} cancelled by a newer load", generation);
                return LoadOutcome::Superseded { generation };
            }
            result = fetch => result,
        };

        let (event, outcome) = match result {
            Ok(results) => {
                let count = results.len();
                (
                    ListingEvent::LoadSucceeded {
                        generation,
                        results,
                    },
                    LoadOutcome::Loaded { generation, count },
                )
            }
            Err(e) => {
                tracing::error!("[ListingFlow] Load #{} failed: {}", generation, e);
                let message = e.to_string();
                (
                    ListingEvent::LoadFailed {
                        generation,
                        message: message.clone(),
                    },
                    LoadOutcome::Failed {
                        generation,
                        message,
                    },
                )
            }
        };

        let mut state = self.state.lock().await;
        if state.generation != generation {
            return LoadOutcome::Superseded { generation };
        }
        *state = std::mem::take(&mut *state).reduce(event);

        if let LoadOutcome::Loaded { count, .. } = &outcome {
            tracing::info!("[ListingFlow] Load #{} finished with {} plants", generation, count);
        }
        outcome
    }

    /// Cancels the previous load, takes a new generation and marks the
    /// listing as loading.
    async fn begin(&self) -> (u64, CancellationToken) {
        let mut in_flight = self.in_flight.lock().await;
        if let Some(previous) = in_flight.cancel.take() {
            previous.cancel();
        }

        in_flight.generation += 1;
        let generation = in_flight.generation;
        let cancel = CancellationToken::new();
        in_flight.cancel = Some(cancel.clone());

        let mut state = self.state.lock().await;
        *state = std::mem::take(&mut *state).reduce(ListingEvent::LoadStarted { generation });

        (generation, cancel)
    }

    /// Returns a snapshot of the listing state.
    pub async fn snapshot(&self) -> ListingState {
        self.state.lock().await.clone()
    }

    /// Returns the record at `index` to pass to the detail screen.
    pub async fn select(&self, index: usize) -> Option<PlantRecord> {
        self.state.lock().await.select(index).cloned()
    }
}

fn describe(request: &LoadRequest) -> String {
    if request.is_search() {
        format!("search '{}'", request.search_term)
    } else if request.filter_token.is_empty() {
        "unfiltered list".to_string()
    } else {
        format!("list filtered by '{}'", request.filter_token)
    }
}
