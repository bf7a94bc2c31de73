//! Load exposure cells from a syndicate premium CSV

use super::{Currency, ExposureCell, LineOfBusiness, SyndicateId};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row matching the syndicate premium extract columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "SyndicateNumber")]
    syndicate_number: u32,
    #[serde(rename = "YearOfAccount")]
    year_of_account: u16,
    #[serde(rename = "ClassCode")]
    class_code: String,
    #[serde(rename = "CurrencyCode")]
    currency_code: String,
    #[serde(rename = "GrossWrittenPremium")]
    gross_written_premium: f64,
    #[serde(rename = "NetWrittenPremium")]
    net_written_premium: f64,
}

impl CsvRow {
    fn to_exposure(self) -> Result<ExposureCell, Box<dyn Error>> {
        let line_of_business = LineOfBusiness::from_code(&self.class_code)
            .ok_or_else(|| format!("Unknown ClassCode: {}", self.class_code))?;

        let currency = Currency::from_code(&self.currency_code)
            .ok_or_else(|| format!("Unknown CurrencyCode: {}", self.currency_code))?;

        let cell = ExposureCell::new(
            SyndicateId(self.syndicate_number),
            self.year_of_account,
            line_of_business,
            currency,
            self.gross_written_premium,
            self.net_written_premium,
        )?;

        Ok(cell)
    }
}

/// Load all exposure cells from a CSV file
pub fn load_exposures<P: AsRef<Path>>(path: P) -> Result<Vec<ExposureCell>, Box<dyn Error>> {
    let reader = std::fs::File::open(path)?;
    load_exposures_from_reader(reader)
}

/// Load exposure cells from any reader (e.g., string buffer, network stream)
pub fn load_exposures_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ExposureCell>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut exposures = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        exposures.push(row.to_exposure()?);
    }

    Ok(exposures)
}
