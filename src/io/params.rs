//! Crop parameter files (JSON).
//!
//! Schema: an object keyed by crop name.
//!
//! ```json
//! {
//!   "rice":  { "yield_per_area": 3.2, "demand": 300, "surplus_penalty": 1.5 },
//!   "maize": { "yield_per_area": 2.8, "demand": 120, "surplus_penalty": 0.9 }
//! }
//! ```
//!
//! The file replaces the built-in table; crops not listed fall back to the
//! per-crop defaults.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::{CropParamTable, CropParameters};
use crate::error::PlanError;

/// Read and validate a crop parameter file.
pub fn read_params_json(path: &Path) -> Result<CropParamTable, PlanError> {
    let file = File::open(path).map_err(|e| {
        PlanError::InvalidParameters(format!("failed to open parameter file '{}': {e}", path.display()))
    })?;
    parse_params(file)
}

/// Parse a crop parameter table from JSON.
pub fn parse_params<R: Read>(reader: R) -> Result<CropParamTable, PlanError> {
    let raw: BTreeMap<String, CropParameters> = serde_json::from_reader(reader)
        .map_err(|e| PlanError::InvalidParameters(format!("invalid parameter JSON: {e}")))?;
    CropParamTable::from_entries(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_crop_names() {
        let json = r#"{ "Maize": { "yield_per_area": 2.8, "demand": 120, "surplus_penalty": 0.9 } }"#;
        let table = parse_params(json.as_bytes()).unwrap();
        assert_eq!(table.get("maize"), CropParameters::new(2.8, 120.0, 0.9));
        // Not in the file: generic defaults, not the built-in rice row.
        assert_eq!(table.get("rice"), CropParameters::default());
    }

    #[test]
    fn rejects_missing_fields_and_bad_values() {
        let missing = r#"{ "rice": { "yield_per_area": 3.2 } }"#;
        assert!(matches!(parse_params(missing.as_bytes()), Err(PlanError::InvalidParameters(_))));

        let negative = r#"{ "rice": { "yield_per_area": 3.2, "demand": 10, "surplus_penalty": -1 } }"#;
        assert!(matches!(parse_params(negative.as_bytes()), Err(PlanError::InvalidParameters(_))));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{ "wheat": { "yield_per_area": 2.0, "demand": 0, "surplus_penalty": 0 } }"#).unwrap();
        let table = read_params_json(&path).unwrap();
        assert!(table.contains("wheat"));
        assert!(read_params_json(&dir.path().join("missing.json")).is_err());
    }
}
