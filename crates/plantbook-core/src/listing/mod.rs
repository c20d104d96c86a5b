//! Listing screen state.
//!
//! The state is owned by the listing controller and only changes through
//! [`ListingState::reduce`], so every transition can be tested without a
//! runtime or a network.

mod state;

pub use state::{ListingEvent, ListingState, LoadRequest};
