//! Run a returns projection from the command line
//!
//! Reads a returns request (JSON), optionally swaps in transactions from a
//! `date,amount` CSV, and prints the per-window projection.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use retirement_engine::transactions::{parse_timestamp, Transaction};
use retirement_engine::{calculate_returns, EngineConfig, ReturnProfile, ReturnsRequest};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliProfile {
    Nps,
    Index,
}

impl From<CliProfile> for ReturnProfile {
    fn from(value: CliProfile) -> Self {
        match value {
            CliProfile::Nps => ReturnProfile::Nps,
            CliProfile::Index => ReturnProfile::Index,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Project round-up savings to retirement")]
struct Args {
    /// Returns request as JSON ({age, wage, inflation, q, p, k, transactions})
    #[arg(long)]
    request: PathBuf,

    /// CSV of `date,amount` rows replacing the request's transactions
    #[arg(long)]
    transactions: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = CliProfile::Nps)]
    profile: CliProfile,

    /// Engine config JSON (defaults to RETIREMENT_ENGINE_CONFIG or built-ins)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the savings windows to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct CsvTransaction {
    date: String,
    amount: f64,
}

fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut transactions = Vec::new();
    for (line, row) in reader.deserialize::<CsvTransaction>().enumerate() {
        let row = row.with_context(|| format!("Bad CSV row {}", line + 2))?;
        let date = parse_timestamp(row.date.trim())
            .with_context(|| format!("Bad date '{}' on CSV row {}", row.date, line + 2))?;
        transactions.push(Transaction { date, amount: row.amount });
    }
    Ok(transactions)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::load()?,
    };

    let file = File::open(&args.request)
        .with_context(|| format!("Failed to open {}", args.request.display()))?;
    let mut request: ReturnsRequest = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse {}", args.request.display()))?;

    if let Some(path) = &args.transactions {
        request.transactions = load_transactions(path)?;
        log::info!("Loaded {} transactions from {}", request.transactions.len(), path.display());
    }

    let profile = ReturnProfile::from(args.profile);
    let result = calculate_returns(&request, profile, &config);

    println!("Profile: {:?} (rate {:.4})", profile, profile.rate(&config));
    println!("Total amount:  {:.2}", result.transactions_total_amount);
    println!("Total ceiling: {:.2}", result.transactions_total_ceiling);
    println!("{:<20} {:<20} {:>12} {:>12} {:>12}", "Start", "End", "Amount", "Profit", "TaxBenefit");
    for window in &result.savings_by_dates {
        println!(
            "{:<20} {:<20} {:>12.2} {:>12.2} {:>12.2}",
            window.start.to_string(),
            window.end.to_string(),
            window.amount,
            window.profit,
            window.tax_benefit
        );
    }

    if let Some(path) = &args.output {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        for window in &result.savings_by_dates {
            writer.serialize(window)?;
        }
        writer.flush()?;
        println!("Output written to {}", path.display());
    }

    Ok(())
}
