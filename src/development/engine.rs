//! Development engine: expands an exposure cell into a maturing claims run

use std::collections::HashMap;

use rand::Rng;

use super::observation::{ClaimsRun, DevelopmentObservation};
use super::pattern::DevelopmentPattern;
use crate::error::{CoreError, CoreResult};
use crate::exposure::{ExposureCell, Tail};
use crate::numeric::ensure_in_range;

/// Longest claims run the engine will project
pub const MAX_DEVELOPMENT_YEARS: u32 = 15;

/// Exclusive upper bound on the loss ratio (allows adverse development above 100%)
pub const MAX_LOSS_RATIO: f64 = 3.0;

/// Largest relative perturbation applied to emergence and paid share
pub const MAX_JITTER: f64 = 0.25;

/// Projects claims runs from exposure cells
///
/// Holds one development pattern per settlement tail and a jitter fraction.
/// With zero jitter the projection is fully deterministic and the supplied
/// random source is never touched.
#[derive(Debug, Clone)]
pub struct DevelopmentEngine {
    patterns: HashMap<Tail, DevelopmentPattern>,
    jitter: f64,
}

impl DevelopmentEngine {
    /// Create an engine with the default tail patterns
    pub fn new(jitter: f64) -> CoreResult<Self> {
        ensure_in_range("development_jitter", jitter, 0.0, MAX_JITTER)?;

        Ok(Self {
            patterns: default_patterns(),
            jitter,
        })
    }

    /// Replace the pattern used for one tail
    pub fn with_pattern(mut self, tail: Tail, pattern: DevelopmentPattern) -> Self {
        self.patterns.insert(tail, pattern);
        self
    }

    pub fn pattern(&self, tail: Tail) -> DevelopmentPattern {
        self.patterns
            .get(&tail)
            .copied()
            .unwrap_or_else(|| DevelopmentPattern::for_tail(tail))
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    /// Project a claims run, perturbing emergence with draws from `rng`
    pub fn project(
        &self,
        exposure: &ExposureCell,
        loss_ratio: f64,
        max_development_years: u32,
        rng: &mut impl Rng,
    ) -> CoreResult<ClaimsRun> {
        let jitter = self.jitter;
        if jitter == 0.0 {
            return self.project_expected(exposure, loss_ratio, max_development_years);
        }

        self.build_run(exposure, loss_ratio, max_development_years, || {
            (
                rng.random_range(-jitter..=jitter),
                rng.random_range(-jitter..=jitter),
            )
        })
    }

    /// Project a claims run on the unperturbed pattern
    pub fn project_expected(
        &self,
        exposure: &ExposureCell,
        loss_ratio: f64,
        max_development_years: u32,
    ) -> CoreResult<ClaimsRun> {
        self.build_run(exposure, loss_ratio, max_development_years, || (0.0, 0.0))
    }

    fn build_run(
        &self,
        exposure: &ExposureCell,
        loss_ratio: f64,
        max_development_years: u32,
        mut perturb: impl FnMut() -> (f64, f64),
    ) -> CoreResult<ClaimsRun> {
        validate_inputs(loss_ratio, max_development_years)?;

        let pattern = self.pattern(exposure.line_of_business.tail());
        let ultimate_loss = exposure.gross_written_premium * loss_ratio;
        let mut run = ClaimsRun::new(exposure.clone(), loss_ratio, ultimate_loss);

        // Running maxima keep paid claims non-decreasing under jitter
        let mut prior_factor = 0.0_f64;
        let mut prior_paid_share = 0.0_f64;

        for development_year in 0..max_development_years {
            let (factor_noise, share_noise) = perturb();

            let nominal = pattern.factor(development_year);
            let factor = if nominal >= 1.0 {
                1.0
            } else {
                (nominal * (1.0 + factor_noise)).clamp(0.0, 1.0)
            }
            .max(prior_factor);

            let paid_share = (pattern.paid_share(development_year) * (1.0 + share_noise))
                .clamp(0.0, 1.0)
                .max(prior_paid_share);

            let emerged = ultimate_loss * factor;
            let cumulative_paid = emerged * paid_share;
            let case_reserve = emerged - cumulative_paid;
            let ibnr_reserve = ultimate_loss * (1.0 - factor) * pattern.residual_share;

            run.add_observation(DevelopmentObservation::new(
                development_year,
                cumulative_paid,
                case_reserve,
                ibnr_reserve,
            ))?;

            prior_factor = factor;
            prior_paid_share = paid_share;
        }

        Ok(run)
    }
}

impl Default for DevelopmentEngine {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            jitter: 0.0,
        }
    }
}

fn default_patterns() -> HashMap<Tail, DevelopmentPattern> {
    [Tail::Short, Tail::Medium, Tail::Long]
        .into_iter()
        .map(|tail| (tail, DevelopmentPattern::for_tail(tail)))
        .collect()
}

/// Project a claims run for `exposure` on the default patterns, without jitter
///
/// Fails with `InvalidParameter` if `loss_ratio` is not in (0, 3) or
/// `max_development_years` is not in [1, 15].
pub fn project_development(
    exposure: &ExposureCell,
    loss_ratio: f64,
    max_development_years: u32,
) -> CoreResult<ClaimsRun> {
    DevelopmentEngine::default().project_expected(exposure, loss_ratio, max_development_years)
}

fn validate_inputs(loss_ratio: f64, max_development_years: u32) -> CoreResult<()> {
    if !(loss_ratio > 0.0) {
        return Err(CoreError::invalid("loss_ratio", loss_ratio, "must be greater than zero"));
    }
    if !(loss_ratio < MAX_LOSS_RATIO) {
        return Err(CoreError::invalid(
            "loss_ratio",
            loss_ratio,
            format!("must be less than {MAX_LOSS_RATIO}"),
        ));
    }
    if !(1..=MAX_DEVELOPMENT_YEARS).contains(&max_development_years) {
        return Err(CoreError::invalid(
            "max_development_years",
            max_development_years as f64,
            format!("must lie in [1, {MAX_DEVELOPMENT_YEARS}]"),
        ));
    }
    Ok(())
}
