//! Claims development: patterns, the development engine and triangles

mod pattern;
mod observation;
mod engine;
mod triangle;

pub use pattern::DevelopmentPattern;
pub use observation::{ClaimsRun, ClaimsRunSummary, DevelopmentObservation};
pub use engine::{project_development, DevelopmentEngine, MAX_DEVELOPMENT_YEARS, MAX_JITTER, MAX_LOSS_RATIO};
pub use triangle::{group_by_syndicate_and_currency, ClaimsTriangle, TriangleBasis};
