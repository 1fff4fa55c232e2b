//! Average price lookup with national fallback.

use tracing::{debug, warn};

use crate::data::history::PriceHistory;
use crate::domain::{PriceQuote, normalize_name};
use crate::error::PlanError;

/// Average observed price for `crop` in `region`.
///
/// Falls back to the national average (flagged via `used_fallback`) when the
/// region is blank or has no records for the crop. Returns
/// [`PlanError::NoData`] when neither level has data; callers must not treat
/// that as a zero price.
pub fn lookup(history: &PriceHistory, crop: &str, region: &str) -> Result<PriceQuote, PlanError> {
    let crop = normalize_name(crop);
    let region = normalize_name(region);

    if !region.is_empty() {
        if let Some(price) = history.regional_average(&crop, &region) {
            return Ok(PriceQuote {
                crop,
                region: Some(region),
                price,
                used_fallback: false,
            });
        }
    }

    let price = history
        .national_average(&crop)
        .ok_or_else(|| PlanError::NoData(format!("no price available for `{crop}`")))?;

    if region.is_empty() {
        debug!(crop = %crop, "no region given; using national average");
    } else {
        warn!(crop = %crop, region = %region, "no regional prices; using national average");
    }
    Ok(PriceQuote {
        crop,
        region: (!region.is_empty()).then_some(region),
        price,
        used_fallback: true,
    })
}
