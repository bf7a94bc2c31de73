//! Syndicate Returns - synthetic Lloyd's regulatory return data
//!
//! This library provides:
//! - Seeded generation of syndicate exposures and capital parameters
//! - Claims development projection (paid, case, IBNR) and claims triangles
//! - SCR aggregation with a diversification credit and MCR corridor bounding
//! - Declarative template layouts (QSR, RRA/RRQ, ASB, LCR, QMA, FSCS) written as CSV

pub mod error;
pub mod numeric;
pub mod config;
pub mod exposure;
pub mod sampling;
pub mod development;
pub mod capital;
pub mod templates;
pub mod scenario;

// Re-export commonly used types
pub use error::{CoreError, CoreResult, ExportError};
pub use config::GeneratorConfig;
pub use exposure::{Currency, ExposureCell, LineOfBusiness, SyndicateId};
pub use development::{project_development, ClaimsRun, DevelopmentEngine, DevelopmentObservation};
pub use capital::{aggregate_mcr, aggregate_scr, CapitalRequirement, RiskModuleFigure, RiskType};
pub use templates::{render, Table, Template};
pub use scenario::{ScenarioRunner, SyndicateReturn};
