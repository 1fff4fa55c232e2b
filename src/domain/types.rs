//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during forecasting and optimization
//! - exported to JSON/CSV
//! - handed to a presentation layer without conversion

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Canonical form of crop and region identifiers: trimmed, lower-case.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Monotone month index used as the forecasting feature (`year * 12 + month`).
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month())
}

/// A single normalized price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub crop: String,
    /// Empty when the record was kept without a recognized region.
    pub region: String,
    pub date: NaiveDate,
    /// Non-negative price per unit of produce.
    pub price: f64,
}

impl PriceRecord {
    pub fn month_index(&self) -> i64 {
        month_index(self.date)
    }
}

/// What to do with rows whose region is not in the recognized whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RegionPolicy {
    /// Skip the row entirely.
    #[default]
    Drop,
    /// Keep the row with an empty region; it only counts toward national figures.
    Unregioned,
}

/// Agronomic and market parameters for one crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropParameters {
    /// Produce per unit of land (> 0).
    pub yield_per_area: f64,
    /// Produce the market absorbs before a surplus penalty applies (>= 0).
    pub demand: f64,
    /// Cost per unit of produce above demand (>= 0).
    pub surplus_penalty: f64,
}

impl Default for CropParameters {
    fn default() -> Self {
        Self {
            yield_per_area: 1.0,
            demand: 0.0,
            surplus_penalty: 1.0,
        }
    }
}

impl CropParameters {
    pub fn new(yield_per_area: f64, demand: f64, surplus_penalty: f64) -> Self {
        Self {
            yield_per_area,
            demand,
            surplus_penalty,
        }
    }

    pub fn validate(&self, crop: &str) -> Result<(), PlanError> {
        if !(self.yield_per_area.is_finite() && self.yield_per_area > 0.0) {
            return Err(PlanError::InvalidParameters(format!(
                "`{crop}`: yield_per_area must be finite and > 0 (got {})",
                self.yield_per_area
            )));
        }
        if !(self.demand.is_finite() && self.demand >= 0.0) {
            return Err(PlanError::InvalidParameters(format!(
                "`{crop}`: demand must be finite and >= 0 (got {})",
                self.demand
            )));
        }
        if !(self.surplus_penalty.is_finite() && self.surplus_penalty >= 0.0) {
            return Err(PlanError::InvalidParameters(format!(
                "`{crop}`: surplus_penalty must be finite and >= 0 (got {})",
                self.surplus_penalty
            )));
        }
        Ok(())
    }
}

/// Per-crop parameter table. Unknown crops resolve to [`CropParameters::default`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropParamTable {
    entries: BTreeMap<String, CropParameters>,
}

impl CropParamTable {
    /// The built-in table for the staple crops the planner ships with.
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("rice".to_string(), CropParameters::new(3.2, 300.0, 1.5));
        entries.insert("wheat".to_string(), CropParameters::new(2.5, 200.0, 1.2));
        entries.insert("sugarcane".to_string(), CropParameters::new(5.0, 150.0, 1.8));
        Self { entries }
    }

    /// Build a validated table; crop names are normalized.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, PlanError>
    where
        I: IntoIterator<Item = (S, CropParameters)>,
        S: AsRef<str>,
    {
        let mut out = BTreeMap::new();
        for (name, params) in entries {
            let crop = normalize_name(name.as_ref());
            if crop.is_empty() {
                return Err(PlanError::InvalidParameters("empty crop name".to_string()));
            }
            params.validate(&crop)?;
            out.insert(crop, params);
        }
        Ok(Self { entries: out })
    }

    pub fn get(&self, crop: &str) -> CropParameters {
        self.entries.get(crop).copied().unwrap_or_default()
    }

    pub fn contains(&self, crop: &str) -> bool {
        self.entries.contains_key(crop)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Random-forest settings for the price forecaster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub trees: usize,
    pub seed: u64,
    /// Minimum number of samples in a leaf.
    pub min_samples_leaf: usize,
    /// `None` grows trees until leaves are pure.
    pub max_depth: Option<usize>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            trees: 50,
            seed: 42,
            min_samples_leaf: 1,
            max_depth: None,
        }
    }
}

/// How a forecast was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMethod {
    /// Fewer than two observations: arithmetic mean (0 when empty).
    Mean,
    /// Random forest over the month index.
    Forest,
}

impl ForecastMethod {
    pub fn label(self) -> &'static str {
        match self {
            ForecastMethod::Mean => "mean",
            ForecastMethod::Forest => "forest",
        }
    }
}

/// Next-period price estimate for one crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub crop: String,
    /// Clamped to >= 0.
    pub predicted_price: f64,
    pub observations: usize,
    pub method: ForecastMethod,
}

/// A request to split `total_land` among `crops`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub total_land: f64,
    /// Normalized, de-duplicated, in caller order.
    pub crops: Vec<String>,
    pub region: Option<String>,
}

impl AllocationRequest {
    /// Normalize crop/region names. Validation happens in the pipeline.
    pub fn new<I, S>(total_land: f64, crops: I, region: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for crop in crops {
            let crop = normalize_name(crop.as_ref());
            if !crop.is_empty() && !normalized.contains(&crop) {
                normalized.push(crop);
            }
        }

        let region = region.map(normalize_name).filter(|r| !r.is_empty());

        Self {
            total_land,
            crops: normalized,
            region,
        }
    }
}

/// Land assigned to a single crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropAllocation {
    pub crop: String,
    pub area_allocated: f64,
    pub percent_of_land: f64,
    pub forecast_price: f64,
    pub observations: usize,
    pub forecast_method: ForecastMethod,
}

/// Full optimizer output, crops in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub region: Option<String>,
    pub total_land: f64,
    /// Optimal LP objective (projected net return).
    pub objective: f64,
    pub allocations: Vec<CropAllocation>,
}

impl AllocationResult {
    pub fn total_allocated(&self) -> f64 {
        self.allocations.iter().map(|a| a.area_allocated).sum()
    }
}

/// Average observed price for a crop, with the level it was taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub crop: String,
    pub region: Option<String>,
    pub price: f64,
    /// `true` when the national average stood in for the regional one.
    pub used_fallback: bool,
}

/// Administrative level of a recognized region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionKind {
    State,
    UnionTerritory,
}

/// Regions present in a dataset, split by administrative level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionListing {
    pub states: Vec<String>,
    pub union_territories: Vec<String>,
}

/// Fertilizer nutrient split for a crop, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientMix {
    pub nitrogen: u8,
    pub phosphorus: u8,
    pub potassium: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_index_increases_across_year_boundary() {
        let dec = NaiveDate::from_ymd_opt(2023, 12, 15).unwrap();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(month_index(jan) - month_index(dec), 1);
        assert_eq!(month_index(jan), 2024 * 12 + 1);
    }

    #[test]
    fn request_normalizes_and_dedupes_crops_in_order() {
        let req = AllocationRequest::new(10.0, [" Wheat", "rice", "WHEAT", ""], Some("  Punjab "));
        assert_eq!(req.crops, vec!["wheat".to_string(), "rice".to_string()]);
        assert_eq!(req.region.as_deref(), Some("punjab"));
    }

    #[test]
    fn blank_region_is_treated_as_none() {
        let req = AllocationRequest::new(10.0, ["rice"], Some("   "));
        assert!(req.region.is_none());
    }

    #[test]
    fn unknown_crop_gets_default_parameters() {
        let table = CropParamTable::builtin();
        assert_eq!(table.get("millet"), CropParameters::new(1.0, 0.0, 1.0));
        assert_eq!(table.get("rice"), CropParameters::new(3.2, 300.0, 1.5));
    }

    #[test]
    fn parameter_validation_rejects_non_positive_yield() {
        let err = CropParamTable::from_entries([("Rice", CropParameters::new(0.0, 10.0, 1.0))]).unwrap_err();
        assert!(matches!(err, PlanError::InvalidParameters(_)));

        let err = CropParamTable::from_entries([("rice", CropParameters::new(1.0, -1.0, 1.0))]).unwrap_err();
        assert!(matches!(err, PlanError::InvalidParameters(_)));
    }

    #[test]
    fn parameter_table_normalizes_names() {
        let table = CropParamTable::from_entries([(" Maize ", CropParameters::new(2.0, 50.0, 0.5))]).unwrap();
        assert!(table.contains("maize"));
        assert_eq!(table.len(), 1);
    }
}
