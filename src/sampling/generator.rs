//! Synthetic syndicate generator
//!
//! Draws everything random about one syndicate (premium cells, loss ratios,
//! risk module capital and the capital parameters) from a single stream.
//! Deterministic calculations downstream consume the resulting profile.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::distributions::UniformRange;
use crate::capital::{basic_scr, operational_charge, RiskModuleFigure, RiskType};
use crate::config::GeneratorConfig;
use crate::error::CoreResult;
use crate::exposure::{ExposureCell, LineOfBusiness, SyndicateId};

/// Loss ratio range by class; every range sits inside (0, 3)
pub fn loss_ratio_range(line_of_business: LineOfBusiness) -> UniformRange {
    let (min, max) = match line_of_business {
        LineOfBusiness::Property => (0.45, 0.85),
        LineOfBusiness::Marine => (0.50, 0.80),
        LineOfBusiness::Aviation => (0.40, 0.90),
        LineOfBusiness::Energy => (0.40, 1.10),
        LineOfBusiness::Casualty => (0.55, 0.95),
        LineOfBusiness::ProfessionalIndemnity => (0.55, 1.00),
        LineOfBusiness::Motor => (0.60, 0.90),
    };
    UniformRange { min, max }
}

/// Diversifiable module capital as a multiple of latest-year gross premium
pub fn module_premium_multiple(risk_type: RiskType) -> UniformRange {
    let (min, max) = match risk_type {
        RiskType::NonLifeUnderwriting => (0.25, 0.40),
        RiskType::Market => (0.08, 0.18),
        RiskType::CounterpartyDefault => (0.03, 0.08),
        RiskType::LifeUnderwriting => (0.0, 0.005),
        RiskType::HealthUnderwriting => (0.0, 0.015),
        RiskType::Operational => (0.0, 0.0),
    };
    UniformRange { min, max }
}

/// Loss-absorbing capacity of deferred taxes as a share of BSCR + operational
const LOSS_ABSORBING_SHARE: UniformRange = UniformRange { min: 0.0, max: 0.12 };

/// One exposure cell and the loss ratio drawn for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureDraw {
    pub exposure: ExposureCell,
    pub loss_ratio: f64,
}

/// Everything random about one syndicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyndicateProfile {
    pub syndicate_id: SyndicateId,
    /// One draw per (year of account, line, currency)
    pub exposures: Vec<ExposureDraw>,
    /// Five diversifiable figures plus one operational figure
    pub risk_modules: Vec<RiskModuleFigure>,
    pub diversification_fraction: f64,
    pub loss_absorbing_adjustment: f64,
    pub own_funds_multiple: f64,
}

impl SyndicateProfile {
    /// Gross premium written in `year_of_account`
    pub fn gross_written_premium(&self, year_of_account: u16) -> f64 {
        self.exposures
            .iter()
            .filter(|d| d.exposure.year_of_account == year_of_account)
            .map(|d| d.exposure.gross_written_premium)
            .sum()
    }
}

/// Config-driven generator of syndicate profiles
#[derive(Debug, Clone)]
pub struct SyndicateGenerator {
    config: GeneratorConfig,
}

impl SyndicateGenerator {
    pub fn new(config: GeneratorConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Draw a full profile for one syndicate
    ///
    /// Draw order is fixed (exposures in year, line, currency order, then
    /// capital parameters) so a given stream always yields the same profile.
    pub fn generate(&self, syndicate_id: SyndicateId, rng: &mut impl Rng) -> CoreResult<SyndicateProfile> {
        let exposures = self.generate_exposures(syndicate_id, rng)?;

        let latest_premium: f64 = exposures
            .iter()
            .filter(|d| d.exposure.year_of_account == self.config.latest_year_of_account())
            .map(|d| d.exposure.gross_written_premium)
            .sum();

        let mut risk_modules = Vec::with_capacity(RiskType::ALL.len());
        for &risk_type in RiskType::DIVERSIFIABLE.iter() {
            let amount = latest_premium * module_premium_multiple(risk_type).sample(rng);
            risk_modules.push(RiskModuleFigure::new(syndicate_id, risk_type, amount)?);
        }
        let sum_before_diversification: f64 = risk_modules.iter().map(|m| m.capital_amount).sum();

        let diversification_fraction = self.config.diversification_fraction.sample(rng);
        let bscr = basic_scr(sum_before_diversification, diversification_fraction)?;
        let operational = operational_charge(bscr, latest_premium)?;
        risk_modules.push(RiskModuleFigure::new(syndicate_id, RiskType::Operational, operational)?);

        let loss_absorbing_adjustment = -(bscr + operational) * LOSS_ABSORBING_SHARE.sample(rng);
        let own_funds_multiple = self.config.own_funds_multiple.sample(rng);

        debug!(
            "Syndicate {}: {} exposure cells, latest premium {:.0}, BSCR {:.0}",
            syndicate_id,
            exposures.len(),
            latest_premium,
            bscr
        );

        Ok(SyndicateProfile {
            syndicate_id,
            exposures,
            risk_modules,
            diversification_fraction,
            loss_absorbing_adjustment,
            own_funds_multiple,
        })
    }

    fn generate_exposures(&self, syndicate_id: SyndicateId, rng: &mut impl Rng) -> CoreResult<Vec<ExposureDraw>> {
        let cells = usize::from(self.config.years_of_account)
            * self.config.lines_of_business.len()
            * self.config.currencies.len();
        let mut draws = Vec::with_capacity(cells);

        for year_of_account in self.config.years() {
            for &line_of_business in &self.config.lines_of_business {
                for &currency in &self.config.currencies {
                    let gross = self.config.premium.sample(rng)?;
                    let net = gross * self.config.net_retention.sample(rng);
                    let exposure = ExposureCell::new(syndicate_id, year_of_account, line_of_business, currency, gross, net)?;
                    let loss_ratio = loss_ratio_range(line_of_business).sample(rng);
                    draws.push(ExposureDraw { exposure, loss_ratio });
                }
            }
        }

        Ok(draws)
    }
}
