//! Risk module figures feeding the SCR aggregation

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::exposure::SyndicateId;
use crate::numeric::ensure_non_negative;

/// Solvency II standard formula risk modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskType {
    Market,
    CounterpartyDefault,
    LifeUnderwriting,
    HealthUnderwriting,
    NonLifeUnderwriting,
    /// Added after diversification, never diversified
    Operational,
}

impl RiskType {
    pub const ALL: [RiskType; 6] = [
        RiskType::Market,
        RiskType::CounterpartyDefault,
        RiskType::LifeUnderwriting,
        RiskType::HealthUnderwriting,
        RiskType::NonLifeUnderwriting,
        RiskType::Operational,
    ];

    /// Modules diversified together into the basic SCR
    pub const DIVERSIFIABLE: [RiskType; 5] = [
        RiskType::Market,
        RiskType::CounterpartyDefault,
        RiskType::LifeUnderwriting,
        RiskType::HealthUnderwriting,
        RiskType::NonLifeUnderwriting,
    ];

    pub fn is_diversifiable(&self) -> bool {
        !matches!(self, RiskType::Operational)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskType::Market => "Market risk",
            RiskType::CounterpartyDefault => "Counterparty default risk",
            RiskType::LifeUnderwriting => "Life underwriting risk",
            RiskType::HealthUnderwriting => "Health underwriting risk",
            RiskType::NonLifeUnderwriting => "Non-life underwriting risk",
            RiskType::Operational => "Operational risk",
        }
    }
}

/// Capital charge for one risk module of one syndicate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskModuleFigure {
    pub syndicate_id: SyndicateId,
    pub risk_type: RiskType,
    /// Always >= 0
    pub capital_amount: f64,
}

impl RiskModuleFigure {
    /// Fails with `InvalidParameter` on a negative or non-finite amount
    pub fn new(syndicate_id: SyndicateId, risk_type: RiskType, capital_amount: f64) -> CoreResult<Self> {
        ensure_non_negative("capital_amount", capital_amount)?;
        Ok(Self {
            syndicate_id,
            risk_type,
            capital_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operational_is_not_diversifiable() {
        assert!(!RiskType::Operational.is_diversifiable());
        assert!(RiskType::DIVERSIFIABLE.iter().all(|r| r.is_diversifiable()));
        assert_eq!(RiskType::ALL.len(), RiskType::DIVERSIFIABLE.len() + 1);
    }

    #[test]
    fn test_negative_capital_rejected() {
        let err = RiskModuleFigure::new(SyndicateId(1), RiskType::Market, -5.0).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(RiskModuleFigure::new(SyndicateId(1), RiskType::Market, 0.0).is_ok());
    }
}
