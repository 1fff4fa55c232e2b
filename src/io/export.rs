//! Export allocation results to CSV or JSON.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts. Areas, percentages, and prices are rounded to 2 decimals here,
//! at the output boundary.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::AllocationResult;
use crate::error::AppError;

/// Round to 2 decimals for display/export.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    crop: &'a str,
    area: f64,
    percent: f64,
    forecast_price: f64,
    observations: usize,
    forecast_method: &'a str,
}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    region: Option<&'a str>,
    land: f64,
    objective: f64,
    allocation: Vec<ExportRow<'a>>,
}

fn export_rows(result: &AllocationResult) -> Vec<ExportRow<'_>> {
    result
        .allocations
        .iter()
        .map(|a| ExportRow {
            crop: &a.crop,
            area: round2(a.area_allocated),
            percent: round2(a.percent_of_land),
            forecast_price: round2(a.forecast_price),
            observations: a.observations,
            forecast_method: a.forecast_method.label(),
        })
        .collect()
}

/// Write one CSV row per crop.
pub fn write_allocation_csv(path: &Path, result: &AllocationResult) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for row in export_rows(result) {
        writer
            .serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    Ok(())
}

/// Write the full result as pretty JSON.
pub fn write_allocation_json(path: &Path, result: &AllocationResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let doc = ExportDocument {
        region: result.region.as_deref(),
        land: result.total_land,
        objective: round2(result.objective),
        allocation: export_rows(result),
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CropAllocation, ForecastMethod};

    fn result() -> AllocationResult {
        AllocationResult {
            region: Some("punjab".to_string()),
            total_land: 30.0,
            objective: 1234.5678,
            allocations: vec![
                CropAllocation {
                    crop: "rice".to_string(),
                    area_allocated: 20.0,
                    percent_of_land: 66.666_666,
                    forecast_price: 21.456,
                    observations: 12,
                    forecast_method: ForecastMethod::Forest,
                },
                CropAllocation {
                    crop: "wheat".to_string(),
                    area_allocated: 10.0,
                    percent_of_land: 33.333_333,
                    forecast_price: 15.0,
                    observations: 1,
                    forecast_method: ForecastMethod::Mean,
                },
            ],
        }
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn csv_export_has_header_and_rounded_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alloc.csv");
        write_allocation_csv(&path, &result()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("crop,area,percent,forecast_price,observations,forecast_method")
        );
        assert_eq!(lines.next(), Some("rice,20.0,66.67,21.46,12,forest"));
        assert_eq!(lines.next(), Some("wheat,10.0,33.33,15.0,1,mean"));
    }

    #[test]
    fn json_export_round_trips_through_serde_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alloc.json");
        write_allocation_json(&path, &result()).unwrap();

        let value: serde_json::Value = serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(value["region"], "punjab");
        assert_eq!(value["objective"], 1234.57);
        assert_eq!(value["allocation"][0]["percent"], 66.67);
        assert_eq!(value["allocation"][1]["forecast_method"], "mean");
    }
}
