//! Output records built from syndicate returns
//!
//! Each record type flattens one level of the return (exposure cell, claims
//! observation, triangle cell, capital requirement) into named fields that
//! template schemas select from.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::schema::{FieldSource, FieldValue};
use crate::capital::{CapitalRequirement, RiskType};
use crate::development::{
    group_by_syndicate_and_currency, ClaimsRun, ClaimsTriangle, DevelopmentObservation, TriangleBasis,
};
use crate::error::CoreResult;
use crate::exposure::{Currency, ExposureCell, SyndicateId};
use crate::scenario::SyndicateReturn;

/// Premium written by one exposure cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PremiumRecord {
    pub reporting_date: NaiveDate,
    pub exposure: ExposureCell,
}

impl PremiumRecord {
    pub fn fscs_protected_premium(&self) -> f64 {
        self.exposure.gross_written_premium * self.exposure.line_of_business.fscs_protected_share()
    }
}

impl FieldSource for PremiumRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        let cell = &self.exposure;
        let value = match name {
            "reporting_date" => self.reporting_date.into(),
            "syndicate_number" => cell.syndicate_id.0.into(),
            "year_of_account" => cell.year_of_account.into(),
            "class_code" => cell.line_of_business.code().into(),
            "lloyds_class" => cell.line_of_business.lloyds_class().into(),
            "currency" => cell.currency.code().into(),
            "gross_written_premium" => cell.gross_written_premium.into(),
            "net_written_premium" => cell.net_written_premium.into(),
            "retention" => FieldValue::Ratio(cell.retention()),
            "fscs_protected_share" => FieldValue::Ratio(cell.line_of_business.fscs_protected_share()),
            "fscs_protected_premium" => self.fscs_protected_premium().into(),
            _ => return None,
        };
        Some(value)
    }
}

/// One development year of one claims run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentRecord {
    pub exposure: ExposureCell,
    pub loss_ratio: f64,
    pub ultimate_loss: f64,
    pub observation: DevelopmentObservation,
}

impl DevelopmentRecord {
    fn new(run: &ClaimsRun, observation: &DevelopmentObservation) -> Self {
        Self {
            exposure: run.exposure.clone(),
            loss_ratio: run.loss_ratio,
            ultimate_loss: run.ultimate_loss,
            observation: *observation,
        }
    }
}

impl FieldSource for DevelopmentRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        let cell = &self.exposure;
        let obs = &self.observation;
        let value = match name {
            "syndicate_number" => cell.syndicate_id.0.into(),
            "year_of_account" => cell.year_of_account.into(),
            "class_code" => cell.line_of_business.code().into(),
            "currency" => cell.currency.code().into(),
            "development_year" => obs.development_year.into(),
            "cumulative_paid" => obs.cumulative_paid.into(),
            "case_reserve" => obs.case_reserve.into(),
            "ibnr_reserve" => obs.ibnr_reserve.into(),
            "outstanding" => obs.outstanding().into(),
            "incurred_total" => obs.incurred_total.into(),
            "ultimate_loss" => self.ultimate_loss.into(),
            "loss_ratio" => FieldValue::Ratio(self.loss_ratio),
            _ => return None,
        };
        Some(value)
    }
}

/// One emerged cell of a paid triangle, with the chain-ladder view of its row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriangleCellRecord {
    pub syndicate_id: SyndicateId,
    pub currency: Currency,
    pub basis: TriangleBasis,
    pub year_of_account: u16,
    pub development_year: u32,
    pub cumulative_value: f64,
    /// Age-to-age factor from this development year to the next, if any
    pub link_ratio: Option<f64>,
    pub chain_ladder_ultimate: f64,
}

impl FieldSource for TriangleCellRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "syndicate_number" => self.syndicate_id.0.into(),
            "currency" => self.currency.code().into(),
            "basis" => self.basis.label().into(),
            "year_of_account" => self.year_of_account.into(),
            "development_year" => self.development_year.into(),
            "cumulative_value" => self.cumulative_value.into(),
            "link_ratio" => self.link_ratio.map(FieldValue::Ratio).unwrap_or(FieldValue::Empty),
            "chain_ladder_ultimate" => self.chain_ladder_ultimate.into(),
            _ => return None,
        };
        Some(value)
    }
}

/// SCR, MCR and coverage for one syndicate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalRecord {
    pub reporting_date: NaiveDate,
    pub capital: CapitalRequirement,
    pub scr_coverage_ratio: f64,
    pub mcr_coverage_ratio: f64,
}

impl CapitalRecord {
    pub fn new(capital: &CapitalRequirement, reporting_date: NaiveDate) -> CoreResult<Self> {
        Ok(Self {
            reporting_date,
            capital: capital.clone(),
            scr_coverage_ratio: capital.scr_coverage_ratio()?,
            mcr_coverage_ratio: capital.mcr_coverage_ratio()?,
        })
    }
}

impl FieldSource for CapitalRecord {
    fn field(&self, name: &str) -> Option<FieldValue> {
        let scr = &self.capital.scr;
        let mcr = &self.capital.mcr;
        let value = match name {
            "reporting_date" => self.reporting_date.into(),
            "syndicate_number" => self.capital.syndicate_id.0.into(),
            "market_risk" => scr.module_amount(RiskType::Market).into(),
            "counterparty_default_risk" => scr.module_amount(RiskType::CounterpartyDefault).into(),
            "life_underwriting_risk" => scr.module_amount(RiskType::LifeUnderwriting).into(),
            "health_underwriting_risk" => scr.module_amount(RiskType::HealthUnderwriting).into(),
            "non_life_underwriting_risk" => scr.module_amount(RiskType::NonLifeUnderwriting).into(),
            "sum_before_diversification" => scr.sum_before_diversification.into(),
            "diversification_fraction" => FieldValue::Ratio(scr.diversification_fraction),
            "diversification_benefit" => scr.diversification_benefit.into(),
            "bscr" => scr.bscr.into(),
            "operational_risk" => scr.operational_risk.into(),
            "loss_absorbing_adjustment" => scr.loss_absorbing_adjustment.into(),
            "scr" => scr.scr.into(),
            "linear_mcr" => mcr.linear_mcr.into(),
            "mcr_floor" => mcr.mcr_floor.into(),
            "mcr_cap" => mcr.mcr_cap.into(),
            "absolute_floor" => mcr.absolute_floor.into(),
            "mcr" => mcr.mcr.into(),
            "mcr_binding" => mcr.binding.label().into(),
            "own_funds" => self.capital.own_funds.into(),
            "scr_coverage_ratio" => FieldValue::Ratio(self.scr_coverage_ratio),
            "mcr_coverage_ratio" => FieldValue::Ratio(self.mcr_coverage_ratio),
            _ => return None,
        };
        Some(value)
    }
}

/// Premium rows for every year of account that has started by the reporting date
pub fn premium_records(returns: &[SyndicateReturn], reporting_date: NaiveDate, valuation_year: u16) -> Vec<PremiumRecord> {
    returns
        .iter()
        .flat_map(|r| &r.claims_runs)
        .filter(|run| run.exposure.year_of_account <= valuation_year)
        .map(|run| PremiumRecord {
            reporting_date,
            exposure: run.exposure.clone(),
        })
        .collect()
}

/// Full emerged history of every claims run
pub fn development_records(returns: &[SyndicateReturn], valuation_year: u16) -> Vec<DevelopmentRecord> {
    returns
        .iter()
        .flat_map(|r| &r.claims_runs)
        .flat_map(|run| {
            run.visible_at(valuation_year)
                .iter()
                .map(move |obs| DevelopmentRecord::new(run, obs))
        })
        .collect()
}

/// Position of every claims run at the valuation year
pub fn latest_development_records(returns: &[SyndicateReturn], valuation_year: u16) -> Vec<DevelopmentRecord> {
    returns
        .iter()
        .flat_map(|r| &r.claims_runs)
        .filter_map(|run| run.as_at(valuation_year).map(|obs| DevelopmentRecord::new(run, obs)))
        .collect()
}

/// Paid triangle cells per syndicate and currency
pub fn triangle_records(returns: &[SyndicateReturn], valuation_year: u16) -> CoreResult<Vec<TriangleCellRecord>> {
    let mut records = Vec::new();

    let groups = group_by_syndicate_and_currency(returns.iter().flat_map(|r| &r.claims_runs));

    for ((syndicate_id, currency), runs) in groups {
        let triangle = ClaimsTriangle::from_runs(runs, TriangleBasis::Paid, valuation_year);
        let links = triangle.link_ratios()?;
        let ultimates: BTreeMap<u16, f64> = triangle.chain_ladder_ultimates()?.into_iter().collect();

        for (row, &year_of_account) in triangle.years_of_account.iter().enumerate() {
            let chain_ladder_ultimate = ultimates.get(&year_of_account).copied().unwrap_or(0.0);
            for (dev, cell) in triangle.cells[row].iter().enumerate() {
                let Some(value) = *cell else { continue };
                // Only factors supported by a later observation in the same row
                let link_ratio = triangle.cells[row]
                    .get(dev + 1)
                    .copied()
                    .flatten()
                    .and(links.get(dev).copied());
                records.push(TriangleCellRecord {
                    syndicate_id,
                    currency,
                    basis: triangle.basis,
                    year_of_account,
                    development_year: dev as u32,
                    cumulative_value: value,
                    link_ratio,
                    chain_ladder_ultimate,
                });
            }
        }
    }

    Ok(records)
}

pub fn capital_records(returns: &[SyndicateReturn], reporting_date: NaiveDate) -> CoreResult<Vec<CapitalRecord>> {
    returns
        .iter()
        .map(|r| CapitalRecord::new(&r.capital, reporting_date))
        .collect()
}
