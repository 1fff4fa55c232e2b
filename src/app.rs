//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - loads the price history snapshot
//! - runs forecasting and land allocation
//! - prints reports and writes optional exports

use clap::Parser;

use crate::cli::{Command, DataArgs, ForecastArgs, ModelArgs, OptimizeArgs, PriceArgs, RegionsArgs};
use crate::data::{HistoryStore, LoadOptions, PriceHistory, lookup, regions};
use crate::domain::{AllocationRequest, CropParamTable, ForecastConfig, normalize_name};
use crate::error::AppError;
use crate::forecast::PriceForecaster;
use crate::report;

pub mod pipeline;

use pipeline::AllocationPipeline;

/// Entry point for the `cropplan` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may provide CROPPLAN_DATA and RUST_LOG; a missing file is fine.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Optimize(args) => handle_optimize(args),
        Command::Forecast(args) => handle_forecast(args),
        Command::Price(args) => handle_price(args),
        Command::Regions(args) => handle_regions(args),
    }
}

fn handle_optimize(args: OptimizeArgs) -> Result<(), AppError> {
    let history = load_history(&args.data)?;

    let params = match &args.params {
        Some(path) => crate::io::read_params_json(path)?,
        None => CropParamTable::builtin(),
    };
    let forecaster = PriceForecaster::new(forecast_config_from_args(&args.model))?;

    let request = AllocationRequest::new(args.land, &args.crops, args.region.as_deref());
    let result = AllocationPipeline::new(&history, &params, forecaster).allocate(&request)?;

    println!("{}", report::format_allocation(&result));

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::write_allocation_csv(path, &result)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::write_allocation_json(path, &result)?;
    }

    Ok(())
}

fn handle_forecast(args: ForecastArgs) -> Result<(), AppError> {
    let history = load_history(&args.data)?;
    let params = CropParamTable::builtin();
    let forecaster = PriceForecaster::new(forecast_config_from_args(&args.model))?;

    let region = args.region.as_deref().map(normalize_name).filter(|r| !r.is_empty());
    let forecast = AllocationPipeline::new(&history, &params, forecaster).forecast_crop(&args.crop, region.as_deref())?;

    println!("{}", report::format_forecast(&forecast, region.as_deref()));
    Ok(())
}

fn handle_price(args: PriceArgs) -> Result<(), AppError> {
    let history = load_history(&args.data)?;

    let quote = lookup(&history, &args.crop, args.region.as_deref().unwrap_or(""))?;
    let fertilizer = regions::fertilizer_profile(&quote.crop);

    print!("{}", report::format_quote(&quote, fertilizer));
    Ok(())
}

fn handle_regions(args: RegionsArgs) -> Result<(), AppError> {
    let history = load_history(&args.data)?;

    print!("{}", report::format_regions(&history.region_listing()));

    if let Some(region) = &args.crops_for {
        let region = normalize_name(region);
        print!("{}", report::format_suggestions(&region, regions::suggested_crops(&region)));
    }
    Ok(())
}

fn load_history(args: &DataArgs) -> Result<std::sync::Arc<PriceHistory>, AppError> {
    let options = LoadOptions {
        region_policy: args.region_policy,
    };
    let store = HistoryStore::open(args.data.clone(), options)?;
    let history = store.snapshot();

    println!("{}", report::format_load_summary(history.stats()));
    Ok(history)
}

fn forecast_config_from_args(args: &ModelArgs) -> ForecastConfig {
    ForecastConfig {
        trees: args.trees,
        seed: args.seed,
        min_samples_leaf: args.min_samples_leaf,
        max_depth: args.max_depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[test]
    fn model_args_map_onto_forecast_config() {
        let cli = Cli::try_parse_from([
            "cropplan", "forecast", "--data", "p.csv", "--crop", "rice", "--trees", "7", "--seed", "9",
            "--max-depth", "3",
        ])
        .unwrap();
        let Command::Forecast(args) = cli.command else {
            panic!("expected forecast");
        };
        let config = forecast_config_from_args(&args.model);
        assert_eq!(config.trees, 7);
        assert_eq!(config.seed, 9);
        assert_eq!(config.min_samples_leaf, 1);
        assert_eq!(config.max_depth, Some(3));
    }

    #[test]
    fn missing_data_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let args = DataArgs {
            data: dir.path().join("absent.csv"),
            region_policy: Default::default(),
        };
        assert!(load_history(&args).is_err());
    }
}
