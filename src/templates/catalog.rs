//! Catalogue of supported Lloyd's return templates

use std::fmt;
use std::str::FromStr;

use super::schema::TemplateSchema;
use crate::error::ExportError;

const QSR_002: TemplateSchema = TemplateSchema {
    code: "QSR 002",
    title: "Premium by class of business",
    mappings: &[
        ("syndicate_number", "Syndicate"),
        ("year_of_account", "YearOfAccount"),
        ("class_code", "ClassCode"),
        ("lloyds_class", "LloydsClass"),
        ("currency", "Currency"),
        ("gross_written_premium", "GrossWrittenPremium"),
        ("net_written_premium", "NetWrittenPremium"),
        ("retention", "Retention"),
    ],
};

const FSCS_001: TemplateSchema = TemplateSchema {
    code: "FSCS 001",
    title: "FSCS protected premium",
    mappings: &[
        ("reporting_date", "ReportingDate"),
        ("syndicate_number", "Syndicate"),
        ("year_of_account", "YearOfAccount"),
        ("class_code", "ClassCode"),
        ("currency", "Currency"),
        ("gross_written_premium", "GrossWrittenPremium"),
        ("fscs_protected_share", "ProtectedShare"),
        ("fscs_protected_premium", "ProtectedPremium"),
    ],
};

const RRA_291: TemplateSchema = TemplateSchema {
    code: "RRA 291",
    title: "Gross claims development",
    mappings: &[
        ("syndicate_number", "Syndicate"),
        ("year_of_account", "YearOfAccount"),
        ("class_code", "ClassCode"),
        ("currency", "Currency"),
        ("development_year", "DevelopmentYear"),
        ("cumulative_paid", "CumulativePaid"),
        ("case_reserve", "CaseReserves"),
        ("ibnr_reserve", "IBNR"),
        ("incurred_total", "Incurred"),
        ("ultimate_loss", "Ultimate"),
    ],
};

const RRQ_291: TemplateSchema = TemplateSchema {
    code: "RRQ 291",
    title: "Quarterly claims position",
    mappings: &[
        ("syndicate_number", "Syndicate"),
        ("year_of_account", "YearOfAccount"),
        ("class_code", "ClassCode"),
        ("currency", "Currency"),
        ("development_year", "DevelopmentYear"),
        ("cumulative_paid", "CumulativePaid"),
        ("outstanding", "Outstanding"),
        ("incurred_total", "Incurred"),
        ("loss_ratio", "UltimateLossRatio"),
    ],
};

const ASB_245: TemplateSchema = TemplateSchema {
    code: "ASB 245",
    title: "Paid claims triangle",
    mappings: &[
        ("syndicate_number", "Syndicate"),
        ("currency", "Currency"),
        ("basis", "Basis"),
        ("year_of_account", "YearOfAccount"),
        ("development_year", "DevelopmentYear"),
        ("cumulative_value", "CumulativePaid"),
        ("link_ratio", "LinkRatio"),
        ("chain_ladder_ultimate", "ChainLadderUltimate"),
    ],
};

const LCR_310: TemplateSchema = TemplateSchema {
    code: "LCR 310",
    title: "SCR components",
    mappings: &[
        ("reporting_date", "ReportingDate"),
        ("syndicate_number", "Syndicate"),
        ("market_risk", "MarketRisk"),
        ("counterparty_default_risk", "CounterpartyDefaultRisk"),
        ("life_underwriting_risk", "LifeUnderwritingRisk"),
        ("health_underwriting_risk", "HealthUnderwritingRisk"),
        ("non_life_underwriting_risk", "NonLifeUnderwritingRisk"),
        ("sum_before_diversification", "SumBeforeDiversification"),
        ("diversification_benefit", "Diversification"),
        ("bscr", "BSCR"),
        ("operational_risk", "OperationalRisk"),
        ("loss_absorbing_adjustment", "LossAbsorbingCapacityOfDeferredTaxes"),
        ("scr", "SCR"),
    ],
};

const QMA_002: TemplateSchema = TemplateSchema {
    code: "QMA 002",
    title: "MCR calculation and coverage",
    mappings: &[
        ("reporting_date", "ReportingDate"),
        ("syndicate_number", "Syndicate"),
        ("linear_mcr", "LinearMCR"),
        ("scr", "SCR"),
        ("mcr_floor", "MCRFloor"),
        ("mcr_cap", "MCRCap"),
        ("absolute_floor", "AbsoluteFloor"),
        ("mcr", "MCR"),
        ("mcr_binding", "BindingConstraint"),
        ("own_funds", "EligibleOwnFunds"),
        ("scr_coverage_ratio", "SCRCoverage"),
        ("mcr_coverage_ratio", "MCRCoverage"),
    ],
};

/// Templates the table assembler can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Qsr002,
    Fscs001,
    Rra291,
    Rrq291,
    Asb245,
    Lcr310,
    Qma002,
}

impl Template {
    pub const ALL: [Template; 7] = [
        Template::Qsr002,
        Template::Fscs001,
        Template::Rra291,
        Template::Rrq291,
        Template::Asb245,
        Template::Lcr310,
        Template::Qma002,
    ];

    pub fn schema(&self) -> &'static TemplateSchema {
        match self {
            Template::Qsr002 => &QSR_002,
            Template::Fscs001 => &FSCS_001,
            Template::Rra291 => &RRA_291,
            Template::Rrq291 => &RRQ_291,
            Template::Asb245 => &ASB_245,
            Template::Lcr310 => &LCR_310,
            Template::Qma002 => &QMA_002,
        }
    }

    pub fn code(&self) -> &'static str {
        self.schema().code
    }

    /// Output file name, e.g. `qsr_002.csv`
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.code().to_lowercase().replace(' ', "_"))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Template {
    type Err = ExportError;

    /// Accepts `QSR 002`, `qsr002`, `QSR_002` and similar spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Template::ALL
            .iter()
            .copied()
            .find(|t| normalize(t.code()) == wanted)
            .ok_or_else(|| ExportError::UnknownTemplate(s.to_string()))
    }
}

fn normalize(code: &str) -> String {
    code.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
