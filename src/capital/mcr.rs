//! Minimum Capital Requirement: linear formula and corridor bounding against SCR

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::exposure::LineOfBusiness;
use crate::numeric::{bounded, ensure_non_negative};

/// MCR may not fall below this share of SCR
pub const MCR_FLOOR_PCT: f64 = 0.25;

/// MCR may not exceed this share of SCR (unless the absolute floor is higher)
pub const MCR_CAP_PCT: f64 = 0.45;

/// Default absolute MCR floor for a non-life undertaking
pub const DEFAULT_ABSOLUTE_MCR_FLOOR: f64 = 4_000_000.0;

/// Which bound determined the combined MCR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum McrBinding {
    /// Linear MCR fell inside the corridor
    Linear,
    /// Raised to 25% of SCR
    ScrFloor,
    /// Capped at 45% of SCR
    ScrCap,
    /// Raised to the absolute floor (possibly above the 45% cap)
    AbsoluteFloor,
}

impl McrBinding {
    pub fn label(&self) -> &'static str {
        match self {
            McrBinding::Linear => "Linear",
            McrBinding::ScrFloor => "SCR floor",
            McrBinding::ScrCap => "SCR cap",
            McrBinding::AbsoluteFloor => "Absolute floor",
        }
    }
}

/// Every intermediate of the MCR calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct McrBreakdown {
    pub linear_mcr: f64,
    pub scr: f64,
    pub mcr_floor: f64,
    pub mcr_cap: f64,
    pub absolute_floor: f64,
    pub mcr: f64,
    pub binding: McrBinding,
}

/// Bound the linear MCR by the SCR corridor and the absolute floor
///
/// `mcr = clamp(linear_mcr, max(0.25 * scr, absolute_floor), 0.45 * scr)`,
/// except that when the absolute floor exceeds the cap the absolute floor wins.
/// A zero SCR has no corridor and is a domain error.
pub fn aggregate_mcr(linear_mcr: f64, scr: f64, absolute_floor: f64) -> CoreResult<McrBreakdown> {
    ensure_non_negative("linear_mcr", linear_mcr)?;
    ensure_non_negative("scr", scr)?;
    ensure_non_negative("absolute_floor", absolute_floor)?;
    if scr == 0.0 {
        return Err(CoreError::domain(
            "aggregate_mcr",
            "scr is zero so the 25%-45% corridor is undefined",
        ));
    }

    let mcr_floor = MCR_FLOOR_PCT * scr;
    let mcr_cap = MCR_CAP_PCT * scr;
    let lower = mcr_floor.max(absolute_floor);
    let mcr = bounded(linear_mcr, lower, mcr_cap);

    let binding = if mcr == linear_mcr {
        McrBinding::Linear
    } else if mcr == mcr_cap && linear_mcr > mcr_cap {
        McrBinding::ScrCap
    } else if absolute_floor > mcr_floor {
        McrBinding::AbsoluteFloor
    } else {
        McrBinding::ScrFloor
    };

    Ok(McrBreakdown {
        linear_mcr,
        scr,
        mcr_floor,
        mcr_cap,
        absolute_floor,
        mcr,
        binding,
    })
}

/// Per-class inputs to the linear MCR formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearMcrInput {
    pub line_of_business: LineOfBusiness,
    /// Net of reinsurance technical provisions (best estimate)
    pub net_best_estimate: f64,
    /// Net written premium over the last twelve months
    pub net_written_premium: f64,
}

/// Non-life linear MCR: sum over classes of alpha x reserves + beta x premium
///
/// Inputs for the same class are summed before the factors are applied.
pub fn linear_mcr(inputs: &[LinearMcrInput]) -> CoreResult<f64> {
    let mut total = 0.0;
    for input in inputs {
        ensure_non_negative("net_best_estimate", input.net_best_estimate)?;
        ensure_non_negative("net_written_premium", input.net_written_premium)?;

        let (alpha, beta) = input.line_of_business.linear_mcr_factors();
        total += alpha * input.net_best_estimate + beta * input.net_written_premium;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const M: f64 = 1_000_000.0;

    #[test]
    fn test_linear_inside_corridor() {
        let mcr = aggregate_mcr(20.0 * M, 60.0 * M, 4.0 * M).unwrap();
        assert_relative_eq!(mcr.mcr_floor, 15.0 * M);
        assert_relative_eq!(mcr.mcr_cap, 27.0 * M);
        assert_eq!(mcr.mcr, 20.0 * M);
        assert_eq!(mcr.binding, McrBinding::Linear);
    }

    #[test]
    fn test_floor_and_cap() {
        let low = aggregate_mcr(5.0 * M, 60.0 * M, 4.0 * M).unwrap();
        assert_relative_eq!(low.mcr, 15.0 * M);
        assert_eq!(low.binding, McrBinding::ScrFloor);

        let high = aggregate_mcr(40.0 * M, 60.0 * M, 4.0 * M).unwrap();
        assert_relative_eq!(high.mcr, 27.0 * M);
        assert_eq!(high.binding, McrBinding::ScrCap);
    }

    #[test]
    fn test_absolute_floor_inside_corridor() {
        let mcr = aggregate_mcr(1.0 * M, 20.0 * M, 7.0 * M).unwrap();
        assert_relative_eq!(mcr.mcr, 7.0 * M);
        assert_eq!(mcr.binding, McrBinding::AbsoluteFloor);
    }

    #[test]
    fn test_absolute_floor_dominates_cap() {
        // Cap is 4.5M but the absolute floor is 6M
        let mcr = aggregate_mcr(3.0 * M, 10.0 * M, 6.0 * M).unwrap();
        assert_relative_eq!(mcr.mcr, 6.0 * M);
        assert!(mcr.mcr > mcr.mcr_cap);
        assert_eq!(mcr.binding, McrBinding::AbsoluteFloor);

        let mcr = aggregate_mcr(9.0 * M, 10.0 * M, 6.0 * M).unwrap();
        assert_relative_eq!(mcr.mcr, 6.0 * M);
    }

    #[test]
    fn test_zero_scr_is_domain_error() {
        let err = aggregate_mcr(1.0 * M, 0.0, 4.0 * M).unwrap_err();
        assert!(err.is_domain());
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(aggregate_mcr(-1.0, 10.0, 0.0).unwrap_err().is_invalid_parameter());
        assert!(aggregate_mcr(1.0, -10.0, 0.0).unwrap_err().is_invalid_parameter());
        assert!(aggregate_mcr(1.0, 10.0, -1.0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_linear_mcr_formula() {
        let inputs = [
            LinearMcrInput {
                line_of_business: LineOfBusiness::Property,
                net_best_estimate: 10.0 * M,
                net_written_premium: 20.0 * M,
            },
            LinearMcrInput {
                line_of_business: LineOfBusiness::Casualty,
                net_best_estimate: 30.0 * M,
                net_written_premium: 0.0,
            },
        ];
        let expected = 0.094 * 10.0 * M + 0.077 * 20.0 * M + 0.103 * 30.0 * M;
        assert_relative_eq!(linear_mcr(&inputs).unwrap(), expected, max_relative = 1e-12);
        assert_eq!(linear_mcr(&[]).unwrap(), 0.0);
    }

    #[test]
    fn test_linear_mcr_rejects_negative_reserves() {
        let inputs = [LinearMcrInput {
            line_of_business: LineOfBusiness::Motor,
            net_best_estimate: -1.0,
            net_written_premium: 0.0,
        }];
        assert!(linear_mcr(&inputs).unwrap_err().is_invalid_parameter());
    }

    proptest! {
        #[test]
        fn prop_mcr_bounded(
            linear in 0.0f64..1e9,
            scr in 1.0f64..1e9,
            absolute_floor in 0.0f64..1e8,
        ) {
            let result = aggregate_mcr(linear, scr, absolute_floor).unwrap();
            let lower = (0.25 * scr).max(absolute_floor);
            prop_assert!(result.mcr >= lower);
            if absolute_floor <= 0.45 * scr {
                prop_assert!(result.mcr <= 0.45 * scr);
            }
        }
    }
}
