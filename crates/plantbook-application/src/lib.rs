pub mod listing_flow;
pub mod preferences_coordinator;

pub use listing_flow::{ListingFlow, LoadOutcome};
pub use preferences_coordinator::{PreferencesCoordinator, PreferencesLoad};
