//! Shared "forecast then optimize" pipeline used by the CLI subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> filter history -> forecast per crop -> solve LP -> shape result
//!
//! Front-ends only decide where the history and parameters come from and how
//! the result is presented.

use tracing::{info, warn};

use crate::data::PriceHistory;
use crate::domain::{
    AllocationRequest, AllocationResult, CropAllocation, CropParamTable, ForecastResult, PriceRecord,
    normalize_name,
};
use crate::error::PlanError;
use crate::forecast::PriceForecaster;
use crate::optimize::{CropInput, optimize_allocation};

/// Forecast-then-optimize over a loaded price history.
#[derive(Debug, Clone, Copy)]
pub struct AllocationPipeline<'a> {
    history: &'a PriceHistory,
    params: &'a CropParamTable,
    forecaster: PriceForecaster,
}

impl<'a> AllocationPipeline<'a> {
    pub fn new(history: &'a PriceHistory, params: &'a CropParamTable, forecaster: PriceForecaster) -> Self {
        Self {
            history,
            params,
            forecaster,
        }
    }

    /// Recommend an area per requested crop.
    pub fn allocate(&self, request: &AllocationRequest) -> Result<AllocationResult, PlanError> {
        // 1) Validate before touching any model.
        validate(request)?;
        // Requests built field-by-field may carry an unnormalized or blank region.
        let region = request.region.as_deref().map(normalize_name).filter(|r| !r.is_empty());
        let region = region.as_deref();

        // 2) Filter history to the region, then the requested crops.
        if let Some(region) = region {
            if !self.history.has_region(region) {
                return Err(PlanError::NoData(format!("no price history for region `{region}`")));
            }
        }

        let series: Vec<Vec<&PriceRecord>> = request
            .crops
            .iter()
            .map(|crop| self.history.records_for(crop, region))
            .collect();

        if series.iter().all(Vec::is_empty) {
            return Err(PlanError::NoData(format!(
                "no price history for {}{}",
                request.crops.join(", "),
                region.map(|r| format!(" in `{r}`")).unwrap_or_default()
            )));
        }

        // 3) Forecast each crop on its (region-filtered) series.
        let forecasts: Vec<ForecastResult> = request
            .crops
            .iter()
            .zip(&series)
            .map(|(crop, records)| {
                if records.is_empty() {
                    warn!(crop = %crop, "no price history for crop; forecasting 0");
                }
                self.forecaster.forecast(crop, records)
            })
            .collect();

        // 4) Solve the allocation program.
        let inputs: Vec<CropInput> = forecasts
            .iter()
            .map(|f| CropInput {
                crop: f.crop.clone(),
                price: f.predicted_price,
                params: self.params.get(&f.crop),
            })
            .collect();
        let plan = optimize_allocation(&inputs, request.total_land)?;

        // 5) Shape the result in request order.
        let allocations = forecasts
            .into_iter()
            .zip(plan.areas)
            .map(|(forecast, area)| CropAllocation {
                percent_of_land: area / request.total_land * 100.0,
                area_allocated: area,
                forecast_price: forecast.predicted_price,
                observations: forecast.observations,
                forecast_method: forecast.method,
                crop: forecast.crop,
            })
            .collect();

        info!(
            crops = request.crops.len(),
            land = request.total_land,
            objective = plan.objective,
            "allocation computed"
        );

        Ok(AllocationResult {
            region: region.map(str::to_string),
            total_land: request.total_land,
            objective: plan.objective,
            allocations,
        })
    }

    /// Next-period price forecast for a single crop.
    pub fn forecast_crop(&self, crop: &str, region: Option<&str>) -> Result<ForecastResult, PlanError> {
        let crop = normalize_name(crop);
        if crop.is_empty() {
            return Err(PlanError::InvalidRequest("crop name is empty".to_string()));
        }
        let region = region.map(normalize_name).filter(|r| !r.is_empty());

        let series = self.history.records_for(&crop, region.as_deref());
        if series.is_empty() {
            return Err(PlanError::NoData(format!(
                "no price history for `{crop}`{}",
                region.map(|r| format!(" in `{r}`")).unwrap_or_default()
            )));
        }
        Ok(self.forecaster.forecast(&crop, &series))
    }
}

fn validate(request: &AllocationRequest) -> Result<(), PlanError> {
    if !(request.total_land.is_finite() && request.total_land > 0.0) {
        return Err(PlanError::InvalidRequest(format!(
            "land must be a positive number (got {})",
            request.total_land
        )));
    }
    if request.crops.is_empty() {
        return Err(PlanError::InvalidRequest("at least one crop is required".to_string()));
    }
    Ok(())
}
