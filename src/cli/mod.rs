//! Command-line parsing for the crop land planner.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the forecasting/optimization code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::RegionPolicy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cropplan", version, about = "Crop land allocation from forecast market prices")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Forecast prices and split land among crops to maximize net return.
    Optimize(OptimizeArgs),
    /// Forecast next month's price for one crop.
    Forecast(ForecastArgs),
    /// Average observed price for a crop, with national fallback.
    Price(PriceArgs),
    /// List the states and union territories present in the data.
    Regions(RegionsArgs),
}

/// Where the price history comes from.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Market price CSV (needs date, crop/commodity, state/region, and price/modal columns).
    #[arg(long, env = "CROPPLAN_DATA", value_name = "CSV")]
    pub data: PathBuf,

    /// What to do with rows whose region is not recognized.
    #[arg(long, value_enum, default_value_t = RegionPolicy::Drop)]
    pub region_policy: RegionPolicy,
}

/// Forecast model knobs.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Number of trees in the forecasting forest.
    #[arg(long, default_value_t = 50)]
    pub trees: usize,

    /// Seed for bootstrap resampling.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Minimum observations per tree leaf.
    #[arg(long, default_value_t = 1)]
    pub min_samples_leaf: usize,

    /// Maximum tree depth (unlimited when omitted).
    #[arg(long)]
    pub max_depth: Option<usize>,
}

#[derive(Debug, Parser, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Total land available.
    #[arg(long, allow_hyphen_values = true)]
    pub land: f64,

    /// Candidate crops, comma separated (e.g. `rice,wheat,sugarcane`).
    #[arg(long, value_delimiter = ',')]
    pub crops: Vec<String>,

    /// Restrict the price history to one state/UT.
    #[arg(long)]
    pub region: Option<String>,

    /// Crop parameter JSON replacing the built-in yield/demand/penalty table.
    #[arg(long, value_name = "JSON")]
    pub params: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,

    /// Export the allocation to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the allocation to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Crop to forecast.
    #[arg(long)]
    pub crop: String,

    /// Forecast from one state/UT's history only.
    #[arg(long)]
    pub region: Option<String>,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct PriceArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Crop to price.
    #[arg(long)]
    pub crop: String,

    /// State/UT; falls back to the national average when it has no data.
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Debug, Parser, Clone)]
pub struct RegionsArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Also list crops commonly grown in this state/UT.
    #[arg(long, value_name = "REGION")]
    pub crops_for: Option<String>,
}
