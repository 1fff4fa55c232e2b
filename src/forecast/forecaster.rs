//! Next-period price forecasting for a single crop.
//!
//! The only feature is the month index (`year * 12 + month`). With fewer than
//! two observations the forecast is the plain mean (0 for an empty series);
//! otherwise a random forest is fit and evaluated one month past the latest
//! observation. Forecasts are clamped to be non-negative.

use tracing::debug;

use crate::domain::{ForecastConfig, ForecastMethod, ForecastResult, PriceRecord};
use crate::error::PlanError;
use crate::forecast::forest::{ForestParams, RandomForest};
use crate::forecast::tree::TreeParams;

/// Minimum number of observations before a model is fit.
const MIN_MODEL_OBSERVATIONS: usize = 2;

/// Forecasts crop prices from historical series.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceForecaster {
    config: ForecastConfig,
}

impl PriceForecaster {
    pub fn new(config: ForecastConfig) -> Result<Self, PlanError> {
        if config.trees == 0 {
            return Err(PlanError::InvalidParameters("forecast needs at least one tree".to_string()));
        }
        if config.min_samples_leaf == 0 {
            return Err(PlanError::InvalidParameters("min_samples_leaf must be >= 1".to_string()));
        }
        if config.max_depth == Some(0) {
            return Err(PlanError::InvalidParameters("max_depth must be >= 1".to_string()));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast the next-period price for `crop` from `series`.
    ///
    /// `series` is whatever the caller wants the forecast conditioned on
    /// (national or region-filtered records).
    pub fn forecast(&self, crop: &str, series: &[&PriceRecord]) -> ForecastResult {
        let observations = series.len();

        if observations < MIN_MODEL_OBSERVATIONS {
            let price = mean(series).unwrap_or(0.0);
            debug!(crop, observations, price, "low-data forecast (mean)");
            return ForecastResult {
                crop: crop.to_string(),
                predicted_price: clamp_price(price),
                observations,
                method: ForecastMethod::Mean,
            };
        }

        let samples: Vec<(f64, f64)> = series
            .iter()
            .map(|r| (r.month_index() as f64, r.price))
            .collect();
        let next_index = series.iter().map(|r| r.month_index()).max().unwrap_or(0) + 1;

        let params = ForestParams {
            trees: self.config.trees,
            seed: self.config.seed,
            tree: TreeParams {
                min_samples_leaf: self.config.min_samples_leaf,
                max_depth: self.config.max_depth,
            },
        };

        let (price, method) = match RandomForest::fit(&samples, params) {
            Some(forest) => (forest.predict(next_index as f64), ForecastMethod::Forest),
            None => (mean(series).unwrap_or(0.0), ForecastMethod::Mean),
        };

        debug!(crop, observations, next_index, price, "forest forecast");
        ForecastResult {
            crop: crop.to_string(),
            predicted_price: clamp_price(price),
            observations,
            method,
        }
    }
}

fn mean(series: &[&PriceRecord]) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    Some(series.iter().map(|r| r.price).sum::<f64>() / series.len() as f64)
}

/// Negative (or non-finite) raw forecasts become 0.
pub fn clamp_price(raw: f64) -> f64 {
    if raw.is_finite() { raw.max(0.0) } else { 0.0 }
}
