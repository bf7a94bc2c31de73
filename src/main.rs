//! Syndicate Returns CLI
//!
//! Generates a synthetic market and writes one CSV per regulatory template

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use syndicate_returns::{GeneratorConfig, ScenarioRunner, SyndicateReturn, Template};

#[derive(Parser, Debug)]
#[command(name = "syndicate_returns", version, about = "Generate synthetic Lloyd's syndicate returns")]
struct Cli {
    /// JSON generator configuration (defaults apply to missing fields)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of syndicates
    #[arg(long)]
    syndicates: Option<u32>,

    /// Directory for template CSVs
    #[arg(short, long, default_value = "output")]
    out_dir: PathBuf,

    /// Template code to write, e.g. "QSR 002" (repeatable, default all)
    #[arg(short, long = "template")]
    templates: Vec<String>,

    /// Print a JSON summary per syndicate to stdout
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SyndicateSummary {
    syndicate: u32,
    claims_runs: usize,
    gross_written_premium: f64,
    ultimate_loss: f64,
    scr: f64,
    mcr: f64,
    mcr_binding: &'static str,
    own_funds: f64,
    scr_coverage_ratio: f64,
}

impl SyndicateSummary {
    fn new(r: &SyndicateReturn) -> Result<Self> {
        Ok(Self {
            syndicate: r.syndicate_id.0,
            claims_runs: r.claims_runs.len(),
            gross_written_premium: r.gross_written_premium(),
            ultimate_loss: r.ultimate_loss(),
            scr: r.capital.scr.scr,
            mcr: r.capital.mcr.mcr,
            mcr_binding: r.capital.mcr.binding.label(),
            own_funds: r.capital.own_funds,
            scr_coverage_ratio: r.capital.scr_coverage_ratio()?,
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_json_path(path)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(count) = cli.syndicates {
        config.syndicate_count = count;
    }

    let templates: Vec<Template> = if cli.templates.is_empty() {
        Template::ALL.to_vec()
    } else {
        cli.templates
            .iter()
            .map(|code| code.parse::<Template>())
            .collect::<Result<_, _>>()?
    };

    let runner = ScenarioRunner::new(config).context("Invalid generator configuration")?;
    let returns = runner.run().context("Scenario run failed")?;

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Unable to create {}", cli.out_dir.display()))?;

    for template in templates {
        let table = runner.render(template, &returns)?;
        let path = cli.out_dir.join(template.file_name());
        table
            .write_csv_path(&path)
            .with_context(|| format!("Unable to write {}", path.display()))?;
        info!("{}: {} rows written to {}", template, table.len(), path.display());
    }

    if cli.json {
        let summaries = returns.iter().map(SyndicateSummary::new).collect::<Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        println!("Generated {} syndicates as at {}", returns.len(), runner.reporting_date());
        println!("{:>9} {:>16} {:>16} {:>14} {:>14} {:>16}", "Syndicate", "GWP", "Ultimate", "SCR", "MCR", "Binding");
        println!("{}", "-".repeat(90));
        for r in &returns {
            println!(
                "{:>9} {:>16.0} {:>16.0} {:>14.0} {:>14.0} {:>16}",
                r.syndicate_id.0,
                r.gross_written_premium(),
                r.ultimate_loss(),
                r.capital.scr.scr,
                r.capital.mcr.mcr,
                r.capital.mcr.binding.label(),
            );
        }
        println!("\nTemplates written to: {}", cli.out_dir.display());
    }

    Ok(())
}
