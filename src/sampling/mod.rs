//! Distribution sampler: seeded random streams and the syndicate generator

mod distributions;
mod generator;

pub use distributions::{rng_for_syndicate, LogNormalRange, ScenarioRng, UniformRange};
pub use generator::{loss_ratio_range, module_premium_multiple, ExposureDraw, SyndicateGenerator, SyndicateProfile};
