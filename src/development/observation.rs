//! Claims development output structures

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::exposure::ExposureCell;

/// Claims position of one exposure cell at one development year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentObservation {
    pub development_year: u32,
    pub cumulative_paid: f64,
    pub case_reserve: f64,
    pub ibnr_reserve: f64,
    /// cumulative_paid + case_reserve + ibnr_reserve
    pub incurred_total: f64,
}

impl DevelopmentObservation {
    pub fn new(development_year: u32, cumulative_paid: f64, case_reserve: f64, ibnr_reserve: f64) -> Self {
        Self {
            development_year,
            cumulative_paid,
            case_reserve,
            ibnr_reserve,
            incurred_total: cumulative_paid + case_reserve + ibnr_reserve,
        }
    }

    /// Reserves still held (case + IBNR)
    pub fn outstanding(&self) -> f64 {
        self.case_reserve + self.ibnr_reserve
    }

    /// Case-incurred: paid plus case reserves, excluding IBNR
    pub fn reported_incurred(&self) -> f64 {
        self.cumulative_paid + self.case_reserve
    }
}

/// Complete synthetic claims run for one exposure cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimsRun {
    /// Exposure the run was projected from
    pub exposure: ExposureCell,

    /// Loss ratio assumption applied to gross premium
    pub loss_ratio: f64,

    /// gross_written_premium * loss_ratio
    pub ultimate_loss: f64,

    /// One observation per development year, starting at 0
    pub observations: Vec<DevelopmentObservation>,
}

impl ClaimsRun {
    pub fn new(exposure: ExposureCell, loss_ratio: f64, ultimate_loss: f64) -> Self {
        Self {
            exposure,
            loss_ratio,
            ultimate_loss,
            observations: Vec::new(),
        }
    }

    /// Append the next development year; years must run 0, 1, 2, ... without gaps
    pub fn add_observation(&mut self, observation: DevelopmentObservation) -> CoreResult<()> {
        let expected = self.observations.len() as u32;
        if observation.development_year != expected {
            return Err(CoreError::invalid(
                "development_year",
                f64::from(observation.development_year),
                format!("expected development year {expected}"),
            ));
        }
        self.observations.push(observation);
        Ok(())
    }

    /// Last projected development year
    pub fn latest(&self) -> Option<&DevelopmentObservation> {
        self.observations.last()
    }

    /// Observation visible at a valuation year (capped at the last projected year)
    ///
    /// Returns None when the year of account has not started yet.
    pub fn as_at(&self, valuation_year: u16) -> Option<&DevelopmentObservation> {
        let dev = self.exposure.development_year_at(valuation_year)? as usize;
        let last = self.observations.len().checked_sub(1)?;
        self.observations.get(dev.min(last))
    }

    /// Observations already emerged at a valuation year
    pub fn visible_at(&self, valuation_year: u16) -> &[DevelopmentObservation] {
        match self.exposure.development_year_at(valuation_year) {
            Some(dev) => {
                let end = (dev as usize + 1).min(self.observations.len());
                &self.observations[..end]
            }
            None => &[],
        }
    }

    /// Get summary statistics
    pub fn summary(&self) -> ClaimsRunSummary {
        let latest = self.latest().copied();
        ClaimsRunSummary {
            development_years: self.observations.len() as u32,
            ultimate_loss: self.ultimate_loss,
            final_paid: latest.map(|o| o.cumulative_paid).unwrap_or(0.0),
            final_incurred: latest.map(|o| o.incurred_total).unwrap_or(0.0),
            final_outstanding: latest.map(|o| o.outstanding()).unwrap_or(0.0),
        }
    }
}

/// Summary statistics for a claims run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsRunSummary {
    pub development_years: u32,
    pub ultimate_loss: f64,
    pub final_paid: f64,
    pub final_incurred: f64,
    pub final_outstanding: f64,
}
