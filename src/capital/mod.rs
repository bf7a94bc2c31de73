//! Capital aggregation: SCR with a diversification credit, MCR bounded against SCR
//!
//! Both aggregations are deterministic. Randomness (diversification fraction,
//! module sizes) lives in the sampling layer and arrives here as plain inputs.
//!
//! # Example
//!
//! ```rust,ignore
//! use syndicate_returns::capital::{aggregate_scr, aggregate_mcr};
//!
//! let scr = aggregate_scr(&modules, -0.20, -3_000_000.0)?;
//! let mcr = aggregate_mcr(linear_mcr, scr.scr, 4_000_000.0)?;
//! println!("SCR {:.0}, MCR {:.0}", scr.scr, mcr.mcr);
//! ```

mod modules;
mod scr;
mod mcr;
mod requirement;

pub use modules::{RiskModuleFigure, RiskType};
pub use scr::{
    aggregate_scr, basic_scr, operational_charge, ScrBreakdown,
    MAX_DIVERSIFICATION_FRACTION, MIN_DIVERSIFICATION_FRACTION,
};
pub use mcr::{
    aggregate_mcr, linear_mcr, LinearMcrInput, McrBinding, McrBreakdown,
    DEFAULT_ABSOLUTE_MCR_FLOOR, MCR_CAP_PCT, MCR_FLOOR_PCT,
};
pub use requirement::{CapitalInputs, CapitalRequirement};
