//! `payslip` - generate salary slips for every employee in a sheet dump
//!
//! The rows file is the JSON array of rows a spreadsheet client returns
//! (`[["Company"], ["App"], ["Name", "Basic Salary", ...], [...], ...]`).

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use log::{info, warn};
use payslip::{GeneratorConfig, SheetData, SlipGenerator};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Generator configuration (JSON)
    #[arg(long)]
    config: PathBuf,

    /// Sheet rows (JSON array of arrays of strings)
    #[arg(long)]
    rows: PathBuf,

    /// Pay period label, e.g. "March 2025"
    #[arg(long)]
    period: String,

    /// Footer date as YYYY-MM-DD (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Write slips here instead of the configured output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = GeneratorConfig::from_json_file(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }

    let rows_json = fs::read_to_string(&args.rows)
        .with_context(|| format!("reading rows {}", args.rows.display()))?;
    let rows: Vec<Vec<String>> =
        serde_json::from_str(&rows_json).context("rows must be an array of string arrays")?;

    let sheet = SheetData::from_rows(&rows);
    if sheet.records.is_empty() {
        warn!("No employee rows found in {}", args.rows.display());
        return Ok(());
    }
    info!(
        "{} employees for {} ({})",
        sheet.records.len(),
        args.period,
        sheet.company.company_name
    );

    let mut generator = SlipGenerator::new(config);
    if let Some(date) = args.date {
        generator = generator.with_generation_date(date);
    }

    let report = generator.generate_batch(&sheet.records, &args.period);
    for slip in &report.generated {
        println!("{}", slip.path.display());
    }
    for (index, err) in &report.failed {
        eprintln!("record {}: {err}", index + 1);
    }

    if !report.is_success() {
        bail!(
            "{} of {} slips failed",
            report.failed.len(),
            sheet.records.len()
        );
    }
    Ok(())
}
