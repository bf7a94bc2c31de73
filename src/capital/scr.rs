//! Solvency Capital Requirement aggregation
//!
//! The diversification credit is a linear fraction of the summed
//! diversifiable modules, drawn per syndicate. This is a modeling
//! simplification of the standard formula (square root over a fixed
//! correlation matrix), not a regulatory-accurate calculation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::modules::{RiskModuleFigure, RiskType};
use crate::error::{CoreError, CoreResult};
use crate::numeric::{ensure_finite, ensure_in_range, ensure_non_negative};

/// Strongest diversification credit allowed
pub const MIN_DIVERSIFICATION_FRACTION: f64 = -0.30;

/// Weakest diversification credit allowed
pub const MAX_DIVERSIFICATION_FRACTION: f64 = -0.10;

/// Operational risk cap as a share of basic SCR
pub const OPERATIONAL_BSCR_CAP: f64 = 0.30;

/// Operational risk charge as a share of earned premium
pub const OPERATIONAL_PREMIUM_FACTOR: f64 = 0.03;

/// Every intermediate of an SCR aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrBreakdown {
    /// Capital per diversifiable module (zero where not supplied)
    pub module_amounts: BTreeMap<RiskType, f64>,
    pub sum_before_diversification: f64,
    pub diversification_fraction: f64,
    /// Negative: sum_before_diversification * diversification_fraction
    pub diversification_benefit: f64,
    pub bscr: f64,
    pub operational_risk: f64,
    /// Negative or zero (deferred tax credit)
    pub loss_absorbing_adjustment: f64,
    /// max(0, bscr + operational_risk + loss_absorbing_adjustment)
    pub scr: f64,
}

impl ScrBreakdown {
    pub fn module_amount(&self, risk_type: RiskType) -> f64 {
        if risk_type == RiskType::Operational {
            return self.operational_risk;
        }
        self.module_amounts.get(&risk_type).copied().unwrap_or(0.0)
    }
}

/// Basic SCR: summed diversifiable capital after the diversification credit
pub fn basic_scr(sum_before_diversification: f64, diversification_fraction: f64) -> CoreResult<f64> {
    ensure_non_negative("sum_before_diversification", sum_before_diversification)?;
    ensure_diversification_fraction(diversification_fraction)?;
    Ok(sum_before_diversification * (1.0 + diversification_fraction))
}

/// Simplified operational charge: min(30% of BSCR, 3% of earned premium)
pub fn operational_charge(bscr: f64, earned_premium: f64) -> CoreResult<f64> {
    ensure_non_negative("bscr", bscr)?;
    ensure_non_negative("earned_premium", earned_premium)?;
    Ok((OPERATIONAL_BSCR_CAP * bscr).min(OPERATIONAL_PREMIUM_FACTOR * earned_premium))
}

/// Aggregate risk module figures into an SCR
///
/// Requires exactly one operational figure and at most one figure per
/// diversifiable risk type. `diversification_fraction` must lie in
/// [-0.30, -0.10] and `loss_absorbing_adjustment` must not be positive.
/// The result is floored at zero however large the adjustment.
pub fn aggregate_scr(
    modules: &[RiskModuleFigure],
    diversification_fraction: f64,
    loss_absorbing_adjustment: f64,
) -> CoreResult<ScrBreakdown> {
    ensure_diversification_fraction(diversification_fraction)?;
    ensure_finite("loss_absorbing_adjustment", loss_absorbing_adjustment)?;
    if loss_absorbing_adjustment > 0.0 {
        return Err(CoreError::invalid(
            "loss_absorbing_adjustment",
            loss_absorbing_adjustment,
            "must not be positive",
        ));
    }

    let mut module_amounts: BTreeMap<RiskType, f64> =
        RiskType::DIVERSIFIABLE.iter().map(|&r| (r, 0.0)).collect();
    let mut seen: Vec<RiskType> = Vec::with_capacity(modules.len());
    let mut operational: Option<f64> = None;

    for figure in modules {
        ensure_non_negative("capital_amount", figure.capital_amount)?;
        if seen.contains(&figure.risk_type) {
            return Err(CoreError::invalid(
                "modules",
                figure.capital_amount,
                format!("duplicate {} figure", figure.risk_type.label()),
            ));
        }
        seen.push(figure.risk_type);

        if figure.risk_type.is_diversifiable() {
            module_amounts.insert(figure.risk_type, figure.capital_amount);
        } else {
            operational = Some(figure.capital_amount);
        }
    }

    let operational_risk = operational.ok_or_else(|| {
        CoreError::invalid("modules", modules.len() as f64, "exactly one operational risk figure is required")
    })?;

    let sum_before_diversification: f64 = module_amounts.values().sum();
    let diversification_benefit = sum_before_diversification * diversification_fraction;
    let bscr = sum_before_diversification + diversification_benefit;
    let scr = (bscr + operational_risk + loss_absorbing_adjustment).max(0.0);

    Ok(ScrBreakdown {
        module_amounts,
        sum_before_diversification,
        diversification_fraction,
        diversification_benefit,
        bscr,
        operational_risk,
        loss_absorbing_adjustment,
        scr,
    })
}

fn ensure_diversification_fraction(fraction: f64) -> CoreResult<f64> {
    ensure_in_range(
        "diversification_fraction",
        fraction,
        MIN_DIVERSIFICATION_FRACTION,
        MAX_DIVERSIFICATION_FRACTION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::SyndicateId;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const M: f64 = 1_000_000.0;

    fn figure(risk_type: RiskType, amount: f64) -> RiskModuleFigure {
        RiskModuleFigure::new(SyndicateId(2001), risk_type, amount).unwrap()
    }

    fn reference_modules() -> Vec<RiskModuleFigure> {
        vec![
            figure(RiskType::Market, 20.0 * M),
            figure(RiskType::CounterpartyDefault, 15.0 * M),
            figure(RiskType::LifeUnderwriting, 5.0 * M),
            figure(RiskType::HealthUnderwriting, 2.0 * M),
            figure(RiskType::NonLifeUnderwriting, 30.0 * M),
            figure(RiskType::Operational, 8.0 * M),
        ]
    }

    #[test]
    fn test_reference_aggregation() {
        let scr = aggregate_scr(&reference_modules(), -0.20, -3.0 * M).unwrap();

        assert_relative_eq!(scr.sum_before_diversification, 72.0 * M, max_relative = 1e-12);
        assert_relative_eq!(scr.diversification_benefit, -14.4 * M, max_relative = 1e-12);
        assert_relative_eq!(scr.bscr, 57.6 * M, max_relative = 1e-12);
        assert_relative_eq!(scr.operational_risk, 8.0 * M);
        assert_relative_eq!(scr.scr, 57.6 * M + 8.0 * M - 3.0 * M, max_relative = 1e-12);
        assert_relative_eq!(scr.module_amount(RiskType::NonLifeUnderwriting), 30.0 * M);
        assert_relative_eq!(scr.module_amount(RiskType::Operational), 8.0 * M);
    }

    #[test]
    fn test_zero_adjustment() {
        let scr = aggregate_scr(&reference_modules(), -0.20, 0.0).unwrap();
        assert_relative_eq!(scr.scr, 65.6 * M, max_relative = 1e-12);
    }

    #[test]
    fn test_scr_floored_at_zero() {
        let scr = aggregate_scr(&reference_modules(), -0.20, -500.0 * M).unwrap();
        assert_eq!(scr.scr, 0.0);
        assert!(scr.bscr > 0.0);
    }

    #[test]
    fn test_missing_modules_count_as_zero() {
        let modules = vec![figure(RiskType::NonLifeUnderwriting, 10.0 * M), figure(RiskType::Operational, 1.0 * M)];
        let scr = aggregate_scr(&modules, -0.10, 0.0).unwrap();
        assert_relative_eq!(scr.bscr, 9.0 * M, max_relative = 1e-12);
        assert_eq!(scr.module_amount(RiskType::Market), 0.0);
    }

    #[test]
    fn test_operational_required_exactly_once() {
        let mut modules = reference_modules();
        modules.pop();
        assert!(aggregate_scr(&modules, -0.2, 0.0).unwrap_err().is_invalid_parameter());

        let mut modules = reference_modules();
        modules.push(figure(RiskType::Operational, 1.0));
        assert!(aggregate_scr(&modules, -0.2, 0.0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_duplicate_module_rejected() {
        let mut modules = reference_modules();
        modules.push(figure(RiskType::Market, 1.0));
        assert!(aggregate_scr(&modules, -0.2, 0.0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_negative_capital_rejected() {
        // Bypass the constructor to simulate malformed upstream data
        let mut modules = reference_modules();
        modules[0].capital_amount = -1.0;
        assert!(aggregate_scr(&modules, -0.2, 0.0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_parameter_bounds() {
        let modules = reference_modules();
        assert!(aggregate_scr(&modules, -0.05, 0.0).is_err());
        assert!(aggregate_scr(&modules, -0.35, 0.0).is_err());
        assert!(aggregate_scr(&modules, -0.30, 0.0).is_ok());
        assert!(aggregate_scr(&modules, -0.10, 0.0).is_ok());
        assert!(aggregate_scr(&modules, -0.2, 1.0).unwrap_err().is_invalid_parameter());
        assert!(aggregate_scr(&modules, -0.2, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let modules = reference_modules();
        let a = aggregate_scr(&modules, -0.17, -2.5 * M).unwrap();
        let b = aggregate_scr(&modules, -0.17, -2.5 * M).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_operational_charge() {
        assert_relative_eq!(operational_charge(100.0 * M, 500.0 * M).unwrap(), 15.0 * M);
        assert_relative_eq!(operational_charge(100.0 * M, 200.0 * M).unwrap(), 6.0 * M);
        assert!(operational_charge(-1.0, 10.0).is_err());
    }

    #[test]
    fn test_basic_scr() {
        assert_relative_eq!(basic_scr(72.0 * M, -0.2).unwrap(), 57.6 * M, max_relative = 1e-12);
        assert!(basic_scr(72.0 * M, 0.2).is_err());
    }

    proptest! {
        #[test]
        fn prop_scr_never_negative(
            amounts in proptest::collection::vec(0.0f64..1e9, 5),
            operational in 0.0f64..1e8,
            fraction in -0.30f64..=-0.10,
            adjustment in -1e10f64..=0.0,
        ) {
            let mut modules: Vec<_> = RiskType::DIVERSIFIABLE
                .iter()
                .zip(&amounts)
                .map(|(&r, &a)| figure(r, a))
                .collect();
            modules.push(figure(RiskType::Operational, operational));

            let scr = aggregate_scr(&modules, fraction, adjustment).unwrap();
            prop_assert!(scr.scr >= 0.0);
            prop_assert!(scr.bscr <= scr.sum_before_diversification);

            let again = aggregate_scr(&modules, fraction, adjustment).unwrap();
            prop_assert_eq!(scr, again);
        }
    }
}
