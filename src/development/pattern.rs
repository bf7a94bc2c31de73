//! Development patterns: how fast losses emerge and get paid by tail

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::exposure::Tail;
use crate::numeric::ensure_in_range;

/// Factors at or above this are treated as fully developed
pub const SATURATION_TOLERANCE: f64 = 1e-9;

/// Emergence and settlement assumptions for one tail
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentPattern {
    /// Fraction of ultimate loss emerged at development year 0
    pub base_fraction: f64,

    /// Additional fraction emerged per development year
    pub increment: f64,

    /// Share of emerged loss already paid at development year 0
    pub paid_share_base: f64,

    /// Additional paid share per development year
    pub paid_share_increment: f64,

    /// Share of the not-yet-emerged loss held as IBNR
    pub residual_share: f64,
}

impl DevelopmentPattern {
    pub fn new(
        base_fraction: f64,
        increment: f64,
        paid_share_base: f64,
        paid_share_increment: f64,
        residual_share: f64,
    ) -> CoreResult<Self> {
        ensure_in_range("base_fraction", base_fraction, 0.0, 1.0)?;
        ensure_in_range("paid_share_base", paid_share_base, 0.0, 1.0)?;
        ensure_in_range("paid_share_increment", paid_share_increment, 0.0, 1.0)?;
        ensure_in_range("residual_share", residual_share, 0.0, 1.0)?;
        ensure_in_range("increment", increment, 0.0, 1.0)?;
        if increment == 0.0 && base_fraction < 1.0 {
            return Err(CoreError::invalid(
                "increment",
                increment,
                "must be positive so the pattern saturates",
            ));
        }

        Ok(Self {
            base_fraction,
            increment,
            paid_share_base,
            paid_share_increment,
            residual_share,
        })
    }

    /// Default pattern for a settlement tail
    ///
    /// Short tail saturates at development year 6, medium at 7, long at 9.
    pub fn for_tail(tail: Tail) -> Self {
        match tail {
            Tail::Short => Self {
                base_fraction: 0.35,
                increment: 0.11,
                paid_share_base: 0.45,
                paid_share_increment: 0.12,
                residual_share: 0.85,
            },
            Tail::Medium => Self {
                base_fraction: 0.22,
                increment: 0.12,
                paid_share_base: 0.35,
                paid_share_increment: 0.10,
                residual_share: 0.80,
            },
            Tail::Long => Self {
                base_fraction: 0.10,
                increment: 0.10,
                paid_share_base: 0.25,
                paid_share_increment: 0.08,
                residual_share: 0.75,
            },
        }
    }

    /// Development factor f(dev_year): non-decreasing, saturating at 1.0
    pub fn factor(&self, development_year: u32) -> f64 {
        let f = (self.base_fraction + development_year as f64 * self.increment).min(1.0);
        if f >= 1.0 - SATURATION_TOLERANCE {
            1.0
        } else {
            f
        }
    }

    /// Share of emerged loss that has been paid, growing with maturity
    pub fn paid_share(&self, development_year: u32) -> f64 {
        (self.paid_share_base + development_year as f64 * self.paid_share_increment).min(1.0)
    }

    /// First development year at which the factor reaches 1.0
    pub fn saturation_year(&self) -> u32 {
        if self.base_fraction >= 1.0 - SATURATION_TOLERANCE {
            return 0;
        }
        let years = ((1.0 - self.base_fraction) / self.increment - SATURATION_TOLERANCE).ceil();
        years.max(0.0) as u32
    }
}
