//! Generator configuration
//!
//! Every field has a serde default, so a JSON file only needs to name the
//! values it changes. `{}` is a valid configuration.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

use crate::capital::{DEFAULT_ABSOLUTE_MCR_FLOOR, MAX_DIVERSIFICATION_FRACTION, MIN_DIVERSIFICATION_FRACTION};
use crate::development::{MAX_DEVELOPMENT_YEARS, MAX_JITTER};
use crate::error::{CoreError, CoreResult};
use crate::exposure::{Currency, LineOfBusiness, SyndicateId};
use crate::numeric::{ensure_in_range, ensure_non_negative};
use crate::sampling::{LogNormalRange, UniformRange};

/// Settings for one synthetic market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Scenario seed shared by every syndicate stream
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_syndicate_count")]
    pub syndicate_count: u32,

    #[serde(default = "default_first_syndicate_number")]
    pub first_syndicate_number: u32,

    #[serde(default = "default_first_year_of_account")]
    pub first_year_of_account: u16,

    /// Number of consecutive years of account per syndicate
    #[serde(default = "default_years_of_account")]
    pub years_of_account: u16,

    #[serde(default = "default_max_development_years")]
    pub max_development_years: u32,

    #[serde(default = "default_lines_of_business")]
    pub lines_of_business: Vec<LineOfBusiness>,

    #[serde(default = "default_currencies")]
    pub currencies: Vec<Currency>,

    /// Gross written premium per exposure cell
    #[serde(default)]
    pub premium: LogNormalRange,

    /// Net / gross premium per exposure cell
    #[serde(default = "default_net_retention")]
    pub net_retention: UniformRange,

    /// Relative noise applied to development factors (0 = expected pattern)
    #[serde(default = "default_development_jitter")]
    pub development_jitter: f64,

    #[serde(default = "default_diversification_fraction")]
    pub diversification_fraction: UniformRange,

    /// Eligible own funds as a multiple of SCR
    #[serde(default = "default_own_funds_multiple")]
    pub own_funds_multiple: UniformRange,

    #[serde(default = "default_absolute_mcr_floor")]
    pub absolute_mcr_floor: f64,

    /// Valuation date; its calendar year is the valuation year
    #[serde(default = "default_reporting_period_end")]
    pub reporting_period_end: NaiveDate,
}

fn default_seed() -> u64 {
    42
}

fn default_syndicate_count() -> u32 {
    5
}

fn default_first_syndicate_number() -> u32 {
    2001
}

fn default_first_year_of_account() -> u16 {
    2020
}

fn default_years_of_account() -> u16 {
    5
}

fn default_max_development_years() -> u32 {
    10
}

fn default_lines_of_business() -> Vec<LineOfBusiness> {
    LineOfBusiness::ALL.to_vec()
}

fn default_currencies() -> Vec<Currency> {
    vec![Currency::GBP, Currency::USD]
}

fn default_net_retention() -> UniformRange {
    UniformRange { min: 0.65, max: 0.95 }
}

fn default_development_jitter() -> f64 {
    0.05
}

fn default_diversification_fraction() -> UniformRange {
    UniformRange {
        min: MIN_DIVERSIFICATION_FRACTION,
        max: MAX_DIVERSIFICATION_FRACTION,
    }
}

fn default_own_funds_multiple() -> UniformRange {
    UniformRange { min: 1.1, max: 2.2 }
}

fn default_absolute_mcr_floor() -> f64 {
    DEFAULT_ABSOLUTE_MCR_FLOOR
}

fn default_reporting_period_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            syndicate_count: default_syndicate_count(),
            first_syndicate_number: default_first_syndicate_number(),
            first_year_of_account: default_first_year_of_account(),
            years_of_account: default_years_of_account(),
            max_development_years: default_max_development_years(),
            lines_of_business: default_lines_of_business(),
            currencies: default_currencies(),
            premium: LogNormalRange::default(),
            net_retention: default_net_retention(),
            development_jitter: default_development_jitter(),
            diversification_fraction: default_diversification_fraction(),
            own_funds_multiple: default_own_funds_multiple(),
            absolute_mcr_floor: default_absolute_mcr_floor(),
            reporting_period_end: default_reporting_period_end(),
        }
    }
}

impl GeneratorConfig {
    /// Load and validate a JSON configuration file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let reader = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.syndicate_count == 0 {
            return Err(CoreError::invalid("syndicate_count", 0.0, "at least one syndicate is required"));
        }
        if self.years_of_account == 0 {
            return Err(CoreError::invalid("years_of_account", 0.0, "at least one year of account is required"));
        }
        if self.first_syndicate_number.checked_add(self.syndicate_count - 1).is_none() {
            return Err(CoreError::invalid(
                "syndicate_count",
                f64::from(self.syndicate_count),
                "syndicate numbers overflow",
            ));
        }
        if self.first_year_of_account.checked_add(self.years_of_account - 1).is_none() {
            return Err(CoreError::invalid(
                "years_of_account",
                f64::from(self.years_of_account),
                "years of account overflow",
            ));
        }
        if self.max_development_years == 0 || self.max_development_years > MAX_DEVELOPMENT_YEARS {
            return Err(CoreError::invalid(
                "max_development_years",
                f64::from(self.max_development_years),
                format!("must lie in [1, {MAX_DEVELOPMENT_YEARS}]"),
            ));
        }
        if self.lines_of_business.is_empty() {
            return Err(CoreError::invalid("lines_of_business", 0.0, "at least one line is required"));
        }
        if self.currencies.is_empty() {
            return Err(CoreError::invalid("currencies", 0.0, "at least one currency is required"));
        }

        self.premium.validate("premium")?;
        self.net_retention.validate("net_retention")?;
        ensure_in_range("net_retention", self.net_retention.min, 0.0, 1.0)?;
        ensure_in_range("net_retention", self.net_retention.max, 0.0, 1.0)?;
        ensure_in_range("development_jitter", self.development_jitter, 0.0, MAX_JITTER)?;

        self.diversification_fraction.validate("diversification_fraction")?;
        for bound in [self.diversification_fraction.min, self.diversification_fraction.max] {
            ensure_in_range(
                "diversification_fraction",
                bound,
                MIN_DIVERSIFICATION_FRACTION,
                MAX_DIVERSIFICATION_FRACTION,
            )?;
        }

        self.own_funds_multiple.validate("own_funds_multiple")?;
        ensure_non_negative("own_funds_multiple", self.own_funds_multiple.min)?;
        ensure_non_negative("absolute_mcr_floor", self.absolute_mcr_floor)?;

        let valuation_year = self.reporting_period_end.year();
        if valuation_year < i32::from(self.first_year_of_account) || valuation_year > i32::from(u16::MAX) {
            return Err(CoreError::invalid(
                "reporting_period_end",
                f64::from(valuation_year),
                format!("valuation year precedes first year of account {}", self.first_year_of_account),
            ));
        }
        Ok(())
    }

    /// Calendar year of the reporting period end
    pub fn valuation_year(&self) -> u16 {
        u16::try_from(self.reporting_period_end.year()).unwrap_or(u16::MAX)
    }

    pub fn years(&self) -> impl Iterator<Item = u16> + '_ {
        (0..self.years_of_account).map(move |offset| self.first_year_of_account + offset)
    }

    pub fn latest_year_of_account(&self) -> u16 {
        self.first_year_of_account + self.years_of_account.saturating_sub(1)
    }

    pub fn syndicate_ids(&self) -> Vec<SyndicateId> {
        (0..self.syndicate_count)
            .map(|offset| SyndicateId(self.first_syndicate_number + offset))
            .collect()
    }
}
