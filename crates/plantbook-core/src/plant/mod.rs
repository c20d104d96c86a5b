//! Plant records and the remote lookup collaborator.
//!
//! Records are opaque to the rest of the core beyond field access; the
//! lookup trait is the seam to whatever plant database backs the listing.

mod lookup;
mod model;

pub use lookup::PlantLookup;
pub use model::PlantRecord;
