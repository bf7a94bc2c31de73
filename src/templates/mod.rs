//! Table assembler: project syndicate returns into Lloyd's return templates
//!
//! Each template is a [`TemplateSchema`] (a list of source field to target
//! column pairs) applied by the single generic [`project`] function to one
//! record type. Adding a template means adding a schema, not code.

mod schema;
mod records;
mod catalog;

pub use schema::{project, FieldSource, FieldValue, Table, TemplateSchema};
pub use records::{
    capital_records, development_records, latest_development_records, premium_records, triangle_records,
    CapitalRecord, DevelopmentRecord, PremiumRecord, TriangleCellRecord,
};
pub use catalog::Template;

use chrono::{Datelike, NaiveDate};

use crate::error::ExportError;
use crate::scenario::SyndicateReturn;

/// Build one template table from a set of syndicate returns
pub fn render(template: Template, returns: &[SyndicateReturn], reporting_date: NaiveDate) -> Result<Table, ExportError> {
    let valuation_year = u16::try_from(reporting_date.year()).unwrap_or(u16::MAX);
    let schema = template.schema();

    match template {
        Template::Qsr002 => project(schema, &premium_records(returns, reporting_date, valuation_year)),
        Template::Fscs001 => {
            let protected: Vec<PremiumRecord> = premium_records(returns, reporting_date, valuation_year)
                .into_iter()
                .filter(|r| r.fscs_protected_premium() > 0.0)
                .collect();
            project(schema, &protected)
        }
        Template::Rra291 => project(schema, &development_records(returns, valuation_year)),
        Template::Rrq291 => project(schema, &latest_development_records(returns, valuation_year)),
        Template::Asb245 => project(schema, &triangle_records(returns, valuation_year)?),
        Template::Lcr310 | Template::Qma002 => project(schema, &capital_records(returns, reporting_date)?),
    }
}
