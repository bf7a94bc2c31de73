//! Scenario runner for a synthetic Lloyd's market
//!
//! Validates the configuration once, then produces one [`SyndicateReturn`]
//! per syndicate: generated exposures, projected claims runs and the
//! resulting capital requirement. Syndicates are independent and run in
//! parallel; each draws from its own random stream, so parallel and
//! sequential runs give identical results.

use chrono::NaiveDate;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::capital::{linear_mcr, CapitalInputs, CapitalRequirement, LinearMcrInput};
use crate::config::GeneratorConfig;
use crate::development::{ClaimsRun, DevelopmentEngine};
use crate::error::{CoreResult, ExportError};
use crate::exposure::SyndicateId;
use crate::sampling::{rng_for_syndicate, SyndicateGenerator};
use crate::templates::{self, Table, Template};

/// Everything reported for one syndicate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyndicateReturn {
    pub syndicate_id: SyndicateId,
    /// One run per exposure cell, in generation order
    pub claims_runs: Vec<ClaimsRun>,
    pub capital: CapitalRequirement,
}

impl SyndicateReturn {
    pub fn gross_written_premium(&self) -> f64 {
        self.claims_runs.iter().map(|r| r.exposure.gross_written_premium).sum()
    }

    pub fn ultimate_loss(&self) -> f64 {
        self.claims_runs.iter().map(|r| r.ultimate_loss).sum()
    }
}

/// Linear MCR inputs from the claims position at the valuation year
///
/// Reserves are the outstanding claims visible at the valuation year, netted
/// down by the cell's retention. Premium counts only for the year of account
/// written in the valuation year.
pub fn linear_mcr_inputs(claims_runs: &[ClaimsRun], valuation_year: u16) -> Vec<LinearMcrInput> {
    claims_runs
        .iter()
        .filter_map(|run| {
            let observation = run.as_at(valuation_year)?;
            let exposure = &run.exposure;
            let net_written_premium = if exposure.year_of_account == valuation_year {
                exposure.net_written_premium
            } else {
                0.0
            };
            Some(LinearMcrInput {
                line_of_business: exposure.line_of_business,
                net_best_estimate: observation.outstanding() * exposure.retention(),
                net_written_premium,
            })
        })
        .collect()
}

/// Pre-validated runner for one market configuration
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    config: GeneratorConfig,
    generator: SyndicateGenerator,
    engine: DevelopmentEngine,
}

impl ScenarioRunner {
    pub fn new(config: GeneratorConfig) -> CoreResult<Self> {
        let generator = SyndicateGenerator::new(config.clone())?;
        let engine = DevelopmentEngine::new(config.development_jitter)?;
        Ok(Self {
            config,
            generator,
            engine,
        })
    }

    /// Replace the development engine, e.g. to use custom patterns
    pub fn with_engine(mut self, engine: DevelopmentEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn reporting_date(&self) -> NaiveDate {
        self.config.reporting_period_end
    }

    /// Generate, project and capitalise one syndicate
    pub fn run_syndicate(&self, syndicate_id: SyndicateId) -> CoreResult<SyndicateReturn> {
        let mut rng = rng_for_syndicate(self.config.seed, syndicate_id);
        let profile = self.generator.generate(syndicate_id, &mut rng)?;

        let claims_runs = profile
            .exposures
            .iter()
            .map(|draw| {
                self.engine
                    .project(&draw.exposure, draw.loss_ratio, self.config.max_development_years, &mut rng)
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let valuation_year = self.config.valuation_year();
        let inputs = CapitalInputs {
            modules: &profile.risk_modules,
            diversification_fraction: profile.diversification_fraction,
            loss_absorbing_adjustment: profile.loss_absorbing_adjustment,
            linear_mcr: linear_mcr(&linear_mcr_inputs(&claims_runs, valuation_year))?,
            absolute_mcr_floor: self.config.absolute_mcr_floor,
        };
        let capital = CapitalRequirement::calculate(syndicate_id, &inputs)?;
        let own_funds = capital.scr.scr * profile.own_funds_multiple;
        let capital = capital.with_own_funds(own_funds)?;

        Ok(SyndicateReturn {
            syndicate_id,
            claims_runs,
            capital,
        })
    }

    /// Run every syndicate, failing on the first error
    ///
    /// Results are ordered by syndicate number.
    pub fn run(&self) -> CoreResult<Vec<SyndicateReturn>> {
        let ids = self.config.syndicate_ids();
        info!("Running {} syndicates (seed {})", ids.len(), self.config.seed);

        let returns = ids
            .par_iter()
            .map(|&id| self.run_syndicate(id))
            .collect::<CoreResult<Vec<_>>>()?;

        info!(
            "Generated {} claims runs across {} syndicates",
            returns.iter().map(|r| r.claims_runs.len()).sum::<usize>(),
            returns.len()
        );
        Ok(returns)
    }

    /// Run every syndicate, keeping failures alongside successes
    pub fn run_each(&self) -> Vec<(SyndicateId, CoreResult<SyndicateReturn>)> {
        let results: Vec<_> = self
            .config
            .syndicate_ids()
            .par_iter()
            .map(|&id| (id, self.run_syndicate(id)))
            .collect();

        for (id, result) in &results {
            if let Err(e) = result {
                warn!("Syndicate {id} skipped: {e}");
            }
        }
        results
    }

    /// Build a template table as at the configured reporting date
    pub fn render(&self, template: Template, returns: &[SyndicateReturn]) -> Result<Table, ExportError> {
        templates::render(template, returns, self.reporting_date())
    }
}
