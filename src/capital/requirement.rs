//! Combined capital requirement for one syndicate

use serde::{Deserialize, Serialize};

use super::mcr::{aggregate_mcr, McrBreakdown};
use super::modules::RiskModuleFigure;
use super::scr::{aggregate_scr, ScrBreakdown};
use crate::error::{CoreError, CoreResult};
use crate::exposure::SyndicateId;
use crate::numeric::{ensure_non_negative, safe_ratio};

/// Inputs needed to derive a syndicate's SCR and MCR
#[derive(Debug, Clone)]
pub struct CapitalInputs<'a> {
    pub modules: &'a [RiskModuleFigure],
    pub diversification_fraction: f64,
    pub loss_absorbing_adjustment: f64,
    pub linear_mcr: f64,
    pub absolute_mcr_floor: f64,
}

/// SCR, MCR and eligible own funds for one syndicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalRequirement {
    pub syndicate_id: SyndicateId,
    pub scr: ScrBreakdown,
    pub mcr: McrBreakdown,
    pub own_funds: f64,
}

impl CapitalRequirement {
    /// Aggregate SCR, then bound MCR against it. Own funds start at zero.
    ///
    /// Every module figure must belong to `syndicate_id`.
    pub fn calculate(syndicate_id: SyndicateId, inputs: &CapitalInputs<'_>) -> CoreResult<Self> {
        if let Some(foreign) = inputs.modules.iter().find(|m| m.syndicate_id != syndicate_id) {
            return Err(CoreError::invalid(
                "modules",
                f64::from(foreign.syndicate_id.0),
                format!(
                    "{} figure belongs to syndicate {}, not {}",
                    foreign.risk_type.label(),
                    foreign.syndicate_id,
                    syndicate_id
                ),
            ));
        }

        let scr = aggregate_scr(
            inputs.modules,
            inputs.diversification_fraction,
            inputs.loss_absorbing_adjustment,
        )?;
        let mcr = aggregate_mcr(inputs.linear_mcr, scr.scr, inputs.absolute_mcr_floor)?;

        Ok(Self {
            syndicate_id,
            scr,
            mcr,
            own_funds: 0.0,
        })
    }

    /// Attach eligible own funds
    pub fn with_own_funds(mut self, own_funds: f64) -> CoreResult<Self> {
        self.own_funds = ensure_non_negative("own_funds", own_funds)?;
        Ok(self)
    }

    /// Eligible own funds / SCR
    pub fn scr_coverage_ratio(&self) -> CoreResult<f64> {
        safe_ratio(self.own_funds, self.scr.scr, "scr_coverage_ratio")
    }

    /// Eligible own funds / MCR
    pub fn mcr_coverage_ratio(&self) -> CoreResult<f64> {
        safe_ratio(self.own_funds, self.mcr.mcr, "mcr_coverage_ratio")
    }

    /// MCR as a share of SCR
    pub fn mcr_to_scr_ratio(&self) -> CoreResult<f64> {
        safe_ratio(self.mcr.mcr, self.scr.scr, "mcr_to_scr_ratio")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capital::RiskType;
    use approx::assert_relative_eq;

    const M: f64 = 1_000_000.0;

    fn modules() -> Vec<RiskModuleFigure> {
        [
            (RiskType::Market, 20.0),
            (RiskType::CounterpartyDefault, 15.0),
            (RiskType::LifeUnderwriting, 5.0),
            (RiskType::HealthUnderwriting, 2.0),
            (RiskType::NonLifeUnderwriting, 30.0),
            (RiskType::Operational, 8.0),
        ]
        .into_iter()
        .map(|(r, a)| RiskModuleFigure::new(SyndicateId(2001), r, a * M).unwrap())
        .collect()
    }

    #[test]
    fn test_calculate_and_ratios() {
        let modules = modules();
        let inputs = CapitalInputs {
            modules: &modules,
            diversification_fraction: -0.20,
            loss_absorbing_adjustment: -5.6 * M,
            linear_mcr: 12.0 * M,
            absolute_mcr_floor: 4.0 * M,
        };
        let req = CapitalRequirement::calculate(SyndicateId(2001), &inputs)
            .and_then(|r| r.with_own_funds(90.0 * M))
            .unwrap();

        assert_relative_eq!(req.scr.scr, 60.0 * M, max_relative = 1e-12);
        assert_relative_eq!(req.mcr.mcr, 15.0 * M, max_relative = 1e-12);
        assert_relative_eq!(req.scr_coverage_ratio().unwrap(), 1.5, max_relative = 1e-12);
        assert_relative_eq!(req.mcr_coverage_ratio().unwrap(), 6.0, max_relative = 1e-12);
        assert_relative_eq!(req.mcr_to_scr_ratio().unwrap(), 0.25, max_relative = 1e-12);

        assert!(req.clone().with_own_funds(-1.0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_figures_from_other_syndicates_rejected() {
        let foreign = vec![
            RiskModuleFigure::new(SyndicateId(9999), RiskType::Market, 20.0 * M).unwrap(),
            RiskModuleFigure::new(SyndicateId(8888), RiskType::Operational, 8.0 * M).unwrap(),
        ];
        let inputs = CapitalInputs {
            modules: &foreign,
            diversification_fraction: -0.20,
            loss_absorbing_adjustment: 0.0,
            linear_mcr: 5.0 * M,
            absolute_mcr_floor: 4.0 * M,
        };
        let err = CapitalRequirement::calculate(SyndicateId(2001), &inputs).unwrap_err();
        assert!(err.is_invalid_parameter());

        // One stray figure among otherwise matching ones is enough
        let mut mixed = modules();
        mixed[2].syndicate_id = SyndicateId(2002);
        let inputs = CapitalInputs {
            modules: &mixed,
            ..inputs
        };
        assert!(CapitalRequirement::calculate(SyndicateId(2001), &inputs)
            .unwrap_err()
            .is_invalid_parameter());
    }

    #[test]
    fn test_zero_scr_surfaces_domain_error() {
        let modules = modules();
        let inputs = CapitalInputs {
            modules: &modules,
            diversification_fraction: -0.20,
            loss_absorbing_adjustment: -1_000.0 * M,
            linear_mcr: 12.0 * M,
            absolute_mcr_floor: 4.0 * M,
        };
        let err = CapitalRequirement::calculate(SyndicateId(2001), &inputs).unwrap_err();
        assert!(err.is_domain());
    }
}
