//! Project claims development for exposures read from a premium CSV
//!
//! Usage: project_exposures <exposures.csv> <valuation_year> [loss_ratio]
//!
//! Projects each cell on the expected pattern, then prints the paid and
//! reported chain-ladder ultimates per year of account, one block per
//! syndicate and currency.

use rayon::prelude::*;
use std::error::Error;
use std::time::Instant;

use syndicate_returns::development::{group_by_syndicate_and_currency, ClaimsTriangle, TriangleBasis};
use syndicate_returns::exposure::load_exposures;
use syndicate_returns::{project_development, ClaimsRun, CoreResult};

const DEFAULT_LOSS_RATIO: f64 = 0.65;
const MAX_DEVELOPMENT_YEARS: u32 = 10;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        return Err("usage: project_exposures <exposures.csv> <valuation_year> [loss_ratio]".into());
    }
    let valuation_year: u16 = args[2].parse()?;
    let loss_ratio: f64 = match args.get(3) {
        Some(arg) => arg.parse()?,
        None => DEFAULT_LOSS_RATIO,
    };

    let start = Instant::now();
    let exposures = load_exposures(&args[1])?;
    println!("Loaded {} exposure cells in {:?}", exposures.len(), start.elapsed());

    let runs: Vec<ClaimsRun> = exposures
        .par_iter()
        .map(|cell| project_development(cell, loss_ratio, MAX_DEVELOPMENT_YEARS))
        .collect::<CoreResult<_>>()?;

    let groups = group_by_syndicate_and_currency(&runs);
    println!(
        "\nChain-ladder ultimates as at {} (loss ratio {:.2}), {} syndicate/currency groups",
        valuation_year,
        loss_ratio,
        groups.len()
    );

    for ((syndicate_id, currency), group) in &groups {
        let paid = ClaimsTriangle::from_runs(group.iter().copied(), TriangleBasis::Paid, valuation_year);
        let reported = ClaimsTriangle::from_runs(group.iter().copied(), TriangleBasis::Reported, valuation_year);
        let paid_ultimates = paid.chain_ladder_ultimates()?;
        let reported_ultimates = reported.chain_ladder_ultimates()?;

        println!("\nSyndicate {} ({})", syndicate_id, currency.code());
        println!("{:>6} {:>18} {:>18} {:>18}", "YoA", "Expected", "Paid CL", "Reported CL");
        println!("{}", "-".repeat(64));

        for ((year, paid_cl), (_, reported_cl)) in paid_ultimates.iter().zip(&reported_ultimates) {
            let expected: f64 = group
                .iter()
                .filter(|r| r.exposure.year_of_account == *year)
                .map(|r| r.ultimate_loss)
                .sum();
            println!("{:>6} {:>18.0} {:>18.0} {:>18.0}", year, expected, paid_cl, reported_cl);
        }
    }

    println!("\nCompleted in {:?}", start.elapsed());
    Ok(())
}
