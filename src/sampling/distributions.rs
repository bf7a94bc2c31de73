//! Bounded random draws and per-syndicate random streams

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, LogNormal};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::exposure::SyndicateId;
use crate::numeric::{ensure_finite, ensure_non_negative};

/// Random source used for every generated figure
pub type ScenarioRng = ChaCha20Rng;

/// Independent stream for one syndicate
///
/// All syndicates share the scenario seed and differ only in stream number,
/// so draws never depend on the order syndicates are processed in.
pub fn rng_for_syndicate(seed: u64, syndicate_id: SyndicateId) -> ScenarioRng {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    rng.set_stream(u64::from(syndicate_id.0));
    rng
}

/// Uniform draw on `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub min: f64,
    pub max: f64,
}

impl UniformRange {
    pub fn new(min: f64, max: f64) -> CoreResult<Self> {
        let range = Self { min, max };
        range.validate("uniform_range")?;
        Ok(range)
    }

    pub fn validate(&self, parameter: &'static str) -> CoreResult<()> {
        ensure_finite(parameter, self.min)?;
        ensure_finite(parameter, self.max)?;
        if self.min > self.max {
            return Err(CoreError::invalid(
                parameter,
                self.min,
                format!("min exceeds max {}", self.max),
            ));
        }
        Ok(())
    }

    /// Degenerate ranges return `min` without consuming randomness
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Log-normal draw parameterised by its median, clamped into `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogNormalRange {
    /// Median of the underlying distribution (exp of mu)
    pub median: f64,
    /// Standard deviation in log space
    pub sigma: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for LogNormalRange {
    /// Gross written premium per exposure cell
    fn default() -> Self {
        Self {
            median: 12_000_000.0,
            sigma: 0.6,
            min: 1_000_000.0,
            max: 150_000_000.0,
        }
    }
}

impl LogNormalRange {
    pub fn validate(&self, parameter: &'static str) -> CoreResult<()> {
        ensure_finite(parameter, self.median)?;
        if self.median <= 0.0 {
            return Err(CoreError::invalid(parameter, self.median, "median must be positive"));
        }
        ensure_non_negative(parameter, self.sigma)?;
        ensure_non_negative(parameter, self.min)?;
        ensure_finite(parameter, self.max)?;
        if self.min > self.max {
            return Err(CoreError::invalid(
                parameter,
                self.min,
                format!("min exceeds max {}", self.max),
            ));
        }
        Ok(())
    }

    pub fn sample(&self, rng: &mut impl Rng) -> CoreResult<f64> {
        let dist = LogNormal::new(self.median.ln(), self.sigma)
            .map_err(|e| CoreError::invalid("sigma", self.sigma, e.to_string()))?;
        Ok(dist.sample(rng).clamp(self.min, self.max))
    }
}
