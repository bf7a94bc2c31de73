//! Claims development triangles and chain-ladder projection
//!
//! A triangle aggregates claims runs by year of account and development year,
//! showing only the cells that have emerged at the valuation year
//! (`year_of_account + development_year <= valuation_year`). From the visible
//! cells we derive volume-weighted age-to-age link ratios, cumulative
//! development factors and chain-ladder ultimates per year of account.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::observation::{ClaimsRun, DevelopmentObservation};
use crate::error::CoreResult;
use crate::exposure::{Currency, SyndicateId};
use crate::numeric::safe_ratio;

/// Quantity accumulated in the triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriangleBasis {
    /// Cumulative paid claims
    Paid,
    /// Paid plus case reserves (excludes IBNR)
    Reported,
}

impl TriangleBasis {
    fn value(&self, observation: &DevelopmentObservation) -> f64 {
        match self {
            TriangleBasis::Paid => observation.cumulative_paid,
            TriangleBasis::Reported => observation.reported_incurred(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TriangleBasis::Paid => "Paid",
            TriangleBasis::Reported => "Reported",
        }
    }
}

/// Cumulative claims triangle, rows by year of account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsTriangle {
    pub basis: TriangleBasis,
    pub valuation_year: u16,
    /// Years of account in ascending order, one per row
    pub years_of_account: Vec<u16>,
    /// `cells[row][development_year]`, None where not yet emerged
    pub cells: Vec<Vec<Option<f64>>>,
}

impl ClaimsTriangle {
    /// Build a triangle from claims runs as at `valuation_year`
    ///
    /// Runs for the same year of account are summed; group runs by currency
    /// before calling if amounts must not be mixed.
    pub fn from_runs<'a, I>(runs: I, basis: TriangleBasis, valuation_year: u16) -> Self
    where
        I: IntoIterator<Item = &'a ClaimsRun>,
    {
        let runs: Vec<&ClaimsRun> = runs.into_iter().collect();
        let width = runs.iter().map(|r| r.observations.len()).max().unwrap_or(0);
        let mut rows: BTreeMap<u16, Vec<Option<f64>>> = BTreeMap::new();

        for run in runs {
            let visible = run.visible_at(valuation_year);
            if visible.is_empty() {
                continue;
            }
            let row = rows
                .entry(run.exposure.year_of_account)
                .or_insert_with(|| vec![None; width]);
            for obs in visible {
                // Runs assembled by hand may skip years; cells past the width are dropped
                if let Some(cell) = row.get_mut(obs.development_year as usize) {
                    *cell = Some(cell.unwrap_or(0.0) + basis.value(obs));
                }
            }
        }

        let (years_of_account, cells): (Vec<u16>, Vec<Vec<Option<f64>>>) = rows.into_iter().unzip();
        Self {
            basis,
            valuation_year,
            years_of_account,
            cells,
        }
    }

    /// Number of development columns
    pub fn width(&self) -> usize {
        self.cells.first().map(|row| row.len()).unwrap_or(0)
    }

    pub fn value(&self, year_of_account: u16, development_year: u32) -> Option<f64> {
        let row = self.years_of_account.iter().position(|&y| y == year_of_account)?;
        self.cells[row].get(development_year as usize).copied().flatten()
    }

    /// Latest emerged (development year, value) for each row
    pub fn latest_diagonal(&self) -> Vec<(u16, u32, f64)> {
        self.years_of_account
            .iter()
            .zip(&self.cells)
            .filter_map(|(&yoa, row)| {
                row.iter()
                    .enumerate()
                    .rev()
                    .find_map(|(dev, cell)| cell.map(|v| (yoa, dev as u32, v)))
            })
            .collect()
    }

    /// Volume-weighted age-to-age factors, one per adjacent column pair
    ///
    /// Columns with no row observed at both ages get a factor of 1.0 (no
    /// further development assumed). A zero denominator over observed rows is
    /// a domain error.
    pub fn link_ratios(&self) -> CoreResult<Vec<f64>> {
        let width = self.width();
        let mut ratios = Vec::with_capacity(width.saturating_sub(1));

        for dev in 0..width.saturating_sub(1) {
            let mut numerator = 0.0;
            let mut denominator = 0.0;
            let mut pairs = 0usize;

            for row in &self.cells {
                if let (Some(from), Some(to)) = (row[dev], row[dev + 1]) {
                    numerator += to;
                    denominator += from;
                    pairs += 1;
                }
            }

            let ratio = if pairs == 0 {
                1.0
            } else {
                safe_ratio(numerator, denominator, "link_ratios")?
            };
            ratios.push(ratio);
        }

        Ok(ratios)
    }

    /// Cumulative development factor to ultimate from each development year
    pub fn cumulative_factors(&self) -> CoreResult<Vec<f64>> {
        let links = self.link_ratios()?;
        let mut factors = vec![1.0; self.width()];
        for dev in (0..links.len()).rev() {
            factors[dev] = factors[dev + 1] * links[dev];
        }
        Ok(factors)
    }

    /// Chain-ladder ultimate per year of account: latest value x CDF at its age
    pub fn chain_ladder_ultimates(&self) -> CoreResult<Vec<(u16, f64)>> {
        let factors = self.cumulative_factors()?;
        Ok(self
            .latest_diagonal()
            .into_iter()
            .map(|(yoa, dev, value)| (yoa, value * factors[dev as usize]))
            .collect())
    }
}

/// Group claims runs into triangle-sized sets, one per syndicate and currency
///
/// Amounts in different currencies or for different syndicates must never be
/// summed into one triangle.
pub fn group_by_syndicate_and_currency<'a, I>(runs: I) -> BTreeMap<(SyndicateId, Currency), Vec<&'a ClaimsRun>>
where
    I: IntoIterator<Item = &'a ClaimsRun>,
{
    let mut groups: BTreeMap<(SyndicateId, Currency), Vec<&'a ClaimsRun>> = BTreeMap::new();
    for run in runs {
        groups
            .entry((run.exposure.syndicate_id, run.exposure.currency))
            .or_default()
            .push(run);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::development::project_development;
    use crate::exposure::{ExposureCell, LineOfBusiness};
    use approx::assert_relative_eq;

    fn run(yoa: u16, gwp: f64) -> ClaimsRun {
        run_for(SyndicateId(1), Currency::GBP, yoa, gwp)
    }

    fn run_for(syndicate_id: SyndicateId, currency: Currency, yoa: u16, gwp: f64) -> ClaimsRun {
        let cell = ExposureCell::new(syndicate_id, yoa, LineOfBusiness::Property, currency, gwp, gwp).unwrap();
        project_development(&cell, 0.6, 10).unwrap()
    }

    #[test]
    fn test_grouping_separates_currencies_and_syndicates() {
        let runs = vec![
            run_for(SyndicateId(2001), Currency::USD, 2022, 1_000_000.0),
            run_for(SyndicateId(2001), Currency::GBP, 2022, 2_000_000.0),
            run_for(SyndicateId(2001), Currency::USD, 2023, 3_000_000.0),
            run_for(SyndicateId(2002), Currency::USD, 2022, 4_000_000.0),
        ];
        let groups = group_by_syndicate_and_currency(&runs);

        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                (SyndicateId(2001), Currency::GBP),
                (SyndicateId(2001), Currency::USD),
                (SyndicateId(2002), Currency::USD),
            ]
        );
        assert_eq!(groups[&(SyndicateId(2001), Currency::USD)].len(), 2);

        // A per-group triangle holds only that group's amounts
        let gbp = ClaimsTriangle::from_runs(
            groups[&(SyndicateId(2001), Currency::GBP)].iter().copied(),
            TriangleBasis::Paid,
            2024,
        );
        let expected = ClaimsTriangle::from_runs(&runs[1..2], TriangleBasis::Paid, 2024);
        assert_eq!(gbp.years_of_account, vec![2022]);
        assert_eq!(gbp.value(2022, 2), expected.value(2022, 2));
    }

    #[test]
    fn test_gapped_run_does_not_panic() {
        let cell = ExposureCell::new(SyndicateId(1), 2020, LineOfBusiness::Marine, Currency::GBP, 100.0, 100.0).unwrap();
        // Built field by field, bypassing add_observation
        let run = ClaimsRun {
            exposure: cell,
            loss_ratio: 0.5,
            ultimate_loss: 50.0,
            observations: vec![
                DevelopmentObservation::new(0, 5.0, 10.0, 20.0),
                DevelopmentObservation::new(3, 30.0, 10.0, 5.0),
            ],
        };
        let triangle = ClaimsTriangle::from_runs([&run], TriangleBasis::Paid, 2024);
        assert_eq!(triangle.width(), 2);
        assert_eq!(triangle.value(2020, 0), Some(5.0));
        assert_eq!(triangle.value(2020, 1), None);
    }

    #[test]
    fn test_triangle_shape() {
        let runs: Vec<_> = (2020..=2024).map(|y| run(y, 1_000_000.0)).collect();
        let triangle = ClaimsTriangle::from_runs(&runs, TriangleBasis::Paid, 2024);

        assert_eq!(triangle.years_of_account, vec![2020, 2021, 2022, 2023, 2024]);
        assert_eq!(triangle.width(), 10);
        assert!(triangle.value(2020, 4).is_some());
        assert!(triangle.value(2020, 5).is_none());
        assert!(triangle.value(2024, 0).is_some());
        assert!(triangle.value(2024, 1).is_none());

        let diagonal = triangle.latest_diagonal();
        assert_eq!(diagonal.len(), 5);
        assert_eq!(diagonal[0].1, 4);
        assert_eq!(diagonal[4].1, 0);
    }

    #[test]
    fn test_runs_for_same_year_are_summed() {
        let runs = vec![run(2022, 1_000_000.0), run(2022, 3_000_000.0)];
        let triangle = ClaimsTriangle::from_runs(&runs, TriangleBasis::Reported, 2023);
        let single = ClaimsTriangle::from_runs(&runs[..1], TriangleBasis::Reported, 2023);

        assert_eq!(triangle.years_of_account, vec![2022]);
        assert_relative_eq!(
            triangle.value(2022, 1).unwrap(),
            4.0 * single.value(2022, 1).unwrap(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_chain_ladder_recovers_pattern_ultimate() {
        // Identical patterns per year: chain ladder on reported claims reproduces
        // the deterministic ultimate once the oldest year is fully developed
        let runs: Vec<_> = (2010..=2024).map(|y| run(y, 2_000_000.0)).collect();
        let triangle = ClaimsTriangle::from_runs(&runs, TriangleBasis::Reported, 2024);

        let links = triangle.link_ratios().unwrap();
        assert_eq!(links.len(), 9);
        assert!(links.iter().all(|&l| l >= 1.0));
        assert_relative_eq!(*links.last().unwrap(), 1.0, max_relative = 1e-12);

        let ultimates = triangle.chain_ladder_ultimates().unwrap();
        for (_, ultimate) in ultimates {
            assert_relative_eq!(ultimate, 1_200_000.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_zero_column_is_domain_error() {
        let runs = vec![run(2022, 0.0), run(2023, 0.0)];
        let triangle = ClaimsTriangle::from_runs(&runs, TriangleBasis::Paid, 2024);
        assert!(triangle.link_ratios().unwrap_err().is_domain());
    }

    #[test]
    fn test_future_years_excluded() {
        let runs = vec![run(2025, 1_000_000.0)];
        let triangle = ClaimsTriangle::from_runs(&runs, TriangleBasis::Paid, 2024);
        assert!(triangle.years_of_account.is_empty());
        assert_eq!(triangle.width(), 0);
        assert!(triangle.chain_ladder_ultimates().unwrap().is_empty());
    }
}
