//! In-memory price history.
//!
//! A `PriceHistory` is built once from a raw table and never mutated
//! afterwards; every query is a read-only filtered view.

use std::collections::{BTreeSet, HashMap};

use tracing::{info, warn};

use crate::data::regions::partition_regions;
use crate::domain::{PriceRecord, RegionListing, RegionPolicy};
use crate::error::PlanError;
use crate::io::ingest::{RawTable, RowError, SchemaMapping, normalize_rows};

/// Options applied while building a history from a raw table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub region_policy: RegionPolicy,
}

/// Bookkeeping from the load step (for diagnostics).
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub rows_read: usize,
    pub rows_used: usize,
    pub dropped_regions: usize,
    pub row_errors: Vec<RowError>,
}

/// Canonical table of price observations.
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    records: Vec<PriceRecord>,
    /// Record positions per crop, in load order.
    by_crop: HashMap<String, Vec<usize>>,
    stats: LoadStats,
}

impl PriceHistory {
    /// Normalize a raw table into a history.
    ///
    /// Fails only when the schema cannot be mapped; bad rows are skipped and
    /// reported in [`LoadStats::row_errors`].
    pub fn load(table: &RawTable, options: LoadOptions) -> Result<Self, PlanError> {
        let columns = SchemaMapping::resolve(&table.headers)?;
        let normalized = normalize_rows(table, columns, options.region_policy);

        if !normalized.row_errors.is_empty() {
            warn!(
                skipped = normalized.row_errors.len(),
                first_line = normalized.row_errors[0].line,
                first_error = %normalized.row_errors[0].message,
                "skipped malformed price rows"
            );
        }

        let stats = LoadStats {
            rows_read: normalized.rows_read,
            rows_used: normalized.records.len(),
            dropped_regions: normalized.dropped_regions,
            row_errors: normalized.row_errors,
        };

        let history = Self::from_records_with_stats(normalized.records, stats);
        info!(
            rows_read = history.stats.rows_read,
            rows_used = history.stats.rows_used,
            dropped_regions = history.stats.dropped_regions,
            crops = history.by_crop.len(),
            "price history loaded"
        );
        Ok(history)
    }

    /// Build a history from already-normalized records.
    pub fn from_records(records: Vec<PriceRecord>) -> Self {
        let stats = LoadStats {
            rows_read: records.len(),
            rows_used: records.len(),
            ..LoadStats::default()
        };
        Self::from_records_with_stats(records, stats)
    }

    fn from_records_with_stats(records: Vec<PriceRecord>, stats: LoadStats) -> Self {
        let mut by_crop: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            by_crop.entry(record.crop.clone()).or_default().push(idx);
        }
        Self {
            records,
            by_crop,
            stats,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// Records for a normalized crop, optionally restricted to one region.
    pub fn records_for(&self, crop: &str, region: Option<&str>) -> Vec<&PriceRecord> {
        let Some(indices) = self.by_crop.get(crop) else {
            return Vec::new();
        };
        indices
            .iter()
            .map(|&idx| &self.records[idx])
            .filter(|r| region.is_none_or(|region| r.region == region))
            .collect()
    }

    /// Mean price for a crop within a region.
    pub fn regional_average(&self, crop: &str, region: &str) -> Option<f64> {
        mean_price(&self.records_for(crop, Some(region)))
    }

    /// Mean price for a crop across all regions (including unregioned rows).
    pub fn national_average(&self, crop: &str) -> Option<f64> {
        mean_price(&self.records_for(crop, None))
    }

    /// Whether any record carries this region. The empty (unregioned) name never matches.
    pub fn has_region(&self, region: &str) -> bool {
        !region.is_empty() && self.records.iter().any(|r| r.region == region)
    }

    /// Distinct crops, sorted.
    pub fn crops(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.by_crop.keys().map(String::as_str).collect();
        set.into_iter().collect()
    }

    /// Distinct non-empty regions, sorted.
    pub fn regions(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .records
            .iter()
            .map(|r| r.region.as_str())
            .filter(|r| !r.is_empty())
            .collect();
        set.into_iter().collect()
    }

    /// Regions present in the data, split into states and union territories.
    pub fn region_listing(&self) -> RegionListing {
        partition_regions(self.regions())
    }
}

pub(crate) fn mean_price(records: &[&PriceRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let sum: f64 = records.iter().map(|r| r.price).sum();
    Some(sum / records.len() as f64)
}
