//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the forecasting/optimization code stays clean and testable
//! - output changes are localized
//!
//! All figures are rounded to 2 decimals here and nowhere else.

use crate::data::LoadStats;
use crate::domain::{AllocationResult, ForecastResult, NutrientMix, PriceQuote, RegionListing};
use crate::io::export::round2;

/// Width of the allocation share bar, in characters, at 100%.
const BAR_WIDTH: usize = 30;

/// One-line load summary printed above every report.
pub fn format_load_summary(stats: &LoadStats) -> String {
    let mut out = format!(
        "Data: {} rows read | {} used | {} outside known regions | {} rejected",
        stats.rows_read,
        stats.rows_used,
        stats.dropped_regions,
        stats.row_errors.len()
    );
    if let Some(first) = stats.row_errors.first() {
        out.push_str(&format!(" (first: line {}: {})", first.line, first.message));
    }
    out
}

/// Allocation table plus a share bar per crop.
pub fn format_allocation(result: &AllocationResult) -> String {
    let mut out = String::new();

    out.push_str("=== cropplan - Land Allocation ===\n");
    out.push_str(&format!(
        "Region: {}\n",
        result.region.as_deref().unwrap_or("all regions")
    ));
    out.push_str(&format!("Land: {:.2}\n", round2(result.total_land)));
    out.push_str(&format!("Projected net return: {:.2}\n\n", round2(result.objective)));

    out.push_str(&format!(
        "{:<16} {:>10} {:>8} {:>10} {:>6} {:<7}  share\n",
        "crop", "area", "percent", "price", "obs", "method"
    ));
    for a in &result.allocations {
        out.push_str(&format!(
            "{:<16} {:>10.2} {:>7.2}% {:>10.2} {:>6} {:<7}  {}\n",
            a.crop,
            round2(a.area_allocated),
            round2(a.percent_of_land),
            round2(a.forecast_price),
            a.observations,
            a.forecast_method.label(),
            share_bar(a.percent_of_land),
        ));
    }

    let unused = result.total_land - result.total_allocated();
    if round2(unused) > 0.0 {
        out.push_str(&format!("\nUnallocated land: {:.2}\n", round2(unused)));
    }

    out
}

fn share_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}

pub fn format_forecast(forecast: &ForecastResult, region: Option<&str>) -> String {
    format!(
        "Forecast for {} ({}): {:.2} next month [{} over {} observations]",
        forecast.crop,
        region.unwrap_or("all regions"),
        round2(forecast.predicted_price),
        forecast.method.label(),
        forecast.observations
    )
}

pub fn format_quote(quote: &PriceQuote, fertilizer: Option<NutrientMix>) -> String {
    let mut out = format!(
        "Average price for {} in {}: {:.2}\n",
        quote.crop,
        quote.region.as_deref().unwrap_or("all regions"),
        round2(quote.price)
    );
    if quote.used_fallback {
        out.push_str("Warning: using national average\n");
    }
    if let Some(mix) = fertilizer {
        out.push_str(&format!(
            "Fertilizer mix: N {}% | P {}% | K {}%\n",
            mix.nitrogen, mix.phosphorus, mix.potassium
        ));
    }
    out
}

pub fn format_regions(listing: &RegionListing) -> String {
    let mut out = String::new();
    out.push_str(&format!("States ({}):\n", listing.states.len()));
    for s in &listing.states {
        out.push_str(&format!("  {s}\n"));
    }
    out.push_str(&format!("Union territories ({}):\n", listing.union_territories.len()));
    for ut in &listing.union_territories {
        out.push_str(&format!("  {ut}\n"));
    }
    out
}

pub fn format_suggestions(region: &str, crops: &[&str]) -> String {
    if crops.is_empty() {
        return format!("No crop suggestions for `{region}`.\n");
    }
    format!("Commonly grown in {region}: {}\n", crops.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CropAllocation, ForecastMethod};

    #[test]
    fn allocation_report_rounds_and_flags_unused_land() {
        let result = AllocationResult {
            region: None,
            total_land: 10.0,
            objective: 99.999,
            allocations: vec![CropAllocation {
                crop: "rice".to_string(),
                area_allocated: 7.5,
                percent_of_land: 75.0,
                forecast_price: 20.123,
                observations: 3,
                forecast_method: ForecastMethod::Forest,
            }],
        };
        let text = format_allocation(&result);
        assert!(text.contains("Region: all regions"));
        assert!(text.contains("Projected net return: 100.00"));
        assert!(text.contains("20.12"));
        assert!(text.contains("75.00%"));
        assert!(text.contains(&"#".repeat(23)));
        assert!(text.contains("Unallocated land: 2.50"));
    }

    #[test]
    fn quote_report_mentions_fallback() {
        let quote = PriceQuote {
            crop: "rice".to_string(),
            region: Some("goa".to_string()),
            price: 25.0,
            used_fallback: true,
        };
        let mix = NutrientMix {
            nitrogen: 50,
            phosphorus: 30,
            potassium: 20,
        };
        let text = format_quote(&quote, Some(mix));
        assert!(text.contains("in goa: 25.00"));
        assert!(text.contains("national average"));
        assert!(text.contains("N 50%"));
    }

    #[test]
    fn load_summary_includes_first_error() {
        let stats = LoadStats {
            rows_read: 3,
            rows_used: 1,
            dropped_regions: 1,
            row_errors: vec![crate::io::ingest::RowError {
                line: 3,
                message: "Invalid price 'abc'.".to_string(),
            }],
        };
        let text = format_load_summary(&stats);
        assert!(text.starts_with("Data: 3 rows read | 1 used | 1 outside known regions | 1 rejected"));
        assert!(text.contains("line 3"));
    }
}
