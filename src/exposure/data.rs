//! Exposure data structures: syndicates, classes of business and premium cells

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::numeric::ensure_non_negative;

/// Lloyd's syndicate number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyndicateId(pub u32);

impl fmt::Display for SyndicateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Speed at which claims on a class settle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tail {
    /// Property-like classes, settled within about six years
    Short,
    /// Marine, aviation and energy
    Medium,
    /// Liability classes, settled over nine years or more
    Long,
}

/// Class of business written by a syndicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineOfBusiness {
    Property,
    Marine,
    Aviation,
    Energy,
    Casualty,
    ProfessionalIndemnity,
    Motor,
}

impl LineOfBusiness {
    pub const ALL: [LineOfBusiness; 7] = [
        LineOfBusiness::Property,
        LineOfBusiness::Marine,
        LineOfBusiness::Aviation,
        LineOfBusiness::Energy,
        LineOfBusiness::Casualty,
        LineOfBusiness::ProfessionalIndemnity,
        LineOfBusiness::Motor,
    ];

    /// Settlement tail used to pick a development pattern
    pub fn tail(&self) -> Tail {
        match self {
            LineOfBusiness::Property | LineOfBusiness::Motor => Tail::Short,
            LineOfBusiness::Marine | LineOfBusiness::Aviation | LineOfBusiness::Energy => Tail::Medium,
            LineOfBusiness::Casualty | LineOfBusiness::ProfessionalIndemnity => Tail::Long,
        }
    }

    /// Short code used in CSV input and template output
    pub fn code(&self) -> &'static str {
        match self {
            LineOfBusiness::Property => "PROP",
            LineOfBusiness::Marine => "MAR",
            LineOfBusiness::Aviation => "AV",
            LineOfBusiness::Energy => "EN",
            LineOfBusiness::Casualty => "CAS",
            LineOfBusiness::ProfessionalIndemnity => "PI",
            LineOfBusiness::Motor => "MOT",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|lob| lob.code() == code)
    }

    /// Lloyd's class of business label
    pub fn lloyds_class(&self) -> &'static str {
        match self {
            LineOfBusiness::Property => "Property (D&F)",
            LineOfBusiness::Marine => "Marine",
            LineOfBusiness::Aviation => "Aviation",
            LineOfBusiness::Energy => "Energy",
            LineOfBusiness::Casualty => "Casualty",
            LineOfBusiness::ProfessionalIndemnity => "Casualty FinPro",
            LineOfBusiness::Motor => "Motor",
        }
    }

    /// Solvency II non-life linear MCR factors as (alpha on net best estimate, beta on net premium)
    pub fn linear_mcr_factors(&self) -> (f64, f64) {
        match self {
            LineOfBusiness::Property => (0.094, 0.077),
            LineOfBusiness::Marine | LineOfBusiness::Aviation | LineOfBusiness::Energy => (0.103, 0.141),
            LineOfBusiness::Casualty | LineOfBusiness::ProfessionalIndemnity => (0.103, 0.131),
            LineOfBusiness::Motor => (0.085, 0.094),
        }
    }

    /// Share of gross premium written for FSCS-protected policyholders
    pub fn fscs_protected_share(&self) -> f64 {
        match self {
            LineOfBusiness::Motor => 1.0,
            LineOfBusiness::Property => 0.25,
            LineOfBusiness::ProfessionalIndemnity => 0.10,
            _ => 0.0,
        }
    }
}

/// Settlement currency of an exposure cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    GBP,
    USD,
    EUR,
    CAD,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::GBP, Currency::USD, Currency::EUR, Currency::CAD];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::GBP => "GBP",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::CAD => "CAD",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }
}

/// Premium written by one syndicate for one year of account, class and currency
///
/// Built through [`ExposureCell::new`], which enforces
/// `0 <= net_written_premium <= gross_written_premium`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureCell {
    /// Syndicate writing the business
    pub syndicate_id: SyndicateId,

    /// Year of account the business is allocated to
    pub year_of_account: u16,

    /// Class of business
    pub line_of_business: LineOfBusiness,

    /// Settlement currency
    pub currency: Currency,

    /// Gross written premium
    pub gross_written_premium: f64,

    /// Premium net of outwards reinsurance
    pub net_written_premium: f64,
}

impl ExposureCell {
    pub fn new(
        syndicate_id: SyndicateId,
        year_of_account: u16,
        line_of_business: LineOfBusiness,
        currency: Currency,
        gross_written_premium: f64,
        net_written_premium: f64,
    ) -> CoreResult<Self> {
        ensure_non_negative("gross_written_premium", gross_written_premium)?;
        ensure_non_negative("net_written_premium", net_written_premium)?;
        if net_written_premium > gross_written_premium {
            return Err(CoreError::invalid(
                "net_written_premium",
                net_written_premium,
                format!("exceeds gross written premium {gross_written_premium}"),
            ));
        }

        Ok(Self {
            syndicate_id,
            year_of_account,
            line_of_business,
            currency,
            gross_written_premium,
            net_written_premium,
        })
    }

    /// Net retention as a fraction of gross premium (1.0 when nothing was written)
    pub fn retention(&self) -> f64 {
        if self.gross_written_premium > 0.0 {
            self.net_written_premium / self.gross_written_premium
        } else {
            1.0
        }
    }

    /// Development year reached by this cell at a valuation year, if it has started
    pub fn development_year_at(&self, valuation_year: u16) -> Option<u32> {
        valuation_year
            .checked_sub(self.year_of_account)
            .map(u32::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn cell(gwp: f64, nwp: f64) -> CoreResult<ExposureCell> {
        ExposureCell::new(SyndicateId(2001), 2022, LineOfBusiness::Marine, Currency::USD, gwp, nwp)
    }

    #[test]
    fn test_net_cannot_exceed_gross() {
        assert!(cell(1_000_000.0, 800_000.0).is_ok());
        assert!(cell(1_000_000.0, 1_000_000.0).is_ok());

        let err = cell(1_000_000.0, 1_200_000.0).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_negative_premium_rejected() {
        assert!(cell(-1.0, 0.0).unwrap_err().is_invalid_parameter());
        assert!(cell(100.0, -1.0).unwrap_err().is_invalid_parameter());
        assert!(cell(f64::NAN, 0.0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_retention_and_development_year() {
        let c = cell(2_000_000.0, 1_500_000.0).unwrap();
        assert_abs_diff_eq!(c.retention(), 0.75);
        assert_eq!(c.development_year_at(2022), Some(0));
        assert_eq!(c.development_year_at(2025), Some(3));
        assert_eq!(c.development_year_at(2021), None);

        assert_abs_diff_eq!(cell(0.0, 0.0).unwrap().retention(), 1.0);
    }

    #[test]
    fn test_codes_round_trip() {
        for lob in LineOfBusiness::ALL {
            assert_eq!(LineOfBusiness::from_code(lob.code()), Some(lob));
        }
        assert_eq!(Currency::from_code("EUR"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("JPY"), None);
    }

    #[test]
    fn test_tails() {
        assert_eq!(LineOfBusiness::Property.tail(), Tail::Short);
        assert_eq!(LineOfBusiness::Energy.tail(), Tail::Medium);
        assert_eq!(LineOfBusiness::ProfessionalIndemnity.tail(), Tail::Long);
    }
}
