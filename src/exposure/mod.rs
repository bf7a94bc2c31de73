//! Exposure data structures and premium extract loading

mod data;
pub mod loader;

pub use data::{Currency, ExposureCell, LineOfBusiness, SyndicateId, Tail};
pub use loader::{load_exposures, load_exposures_from_reader};
