//! CSV ingest, schema mapping, and row normalization.
//!
//! This module is responsible for turning a heterogeneous market-price CSV into
//! clean `(crop, region, date, price)` records that are safe to forecast on.
//!
//! Design goals:
//! - **Heuristic schema** for the four required fields, resolved once per load
//!   (all missing fields reported together)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no forecasting logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::data::regions::is_known_region;
use crate::domain::{PriceRecord, RegionPolicy, normalize_name};
use crate::error::PlanError;

/// One data row with its 1-based source line.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub fields: Vec<String>,
}

/// Untyped tabular input: normalized header names plus string cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Rows the CSV reader itself could not parse.
    pub read_errors: Vec<RowError>,
}

impl RawTable {
    /// Build a table from in-memory cells (line numbers assume a header line).
    pub fn new<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|h| normalize_header_name(h.as_ref()))
            .collect();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| RawRow {
                line: idx + 2,
                fields: cells.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self {
            headers,
            rows,
            read_errors: Vec::new(),
        }
    }
}

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Read a CSV file into a [`RawTable`].
pub fn read_csv(path: &Path) -> Result<RawTable, PlanError> {
    let file = File::open(path)
        .map_err(|e| PlanError::DataFormat(format!("failed to open CSV '{}': {e}", path.display())))?;
    read_csv_from_reader(file)
}

/// Read CSV data from any reader into a [`RawTable`].
pub fn read_csv_from_reader<R: Read>(reader: R) -> Result<RawTable, PlanError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PlanError::DataFormat(format!("failed to read CSV headers: {e}")))?
        .iter()
        .map(normalize_header_name)
        .collect();

    let mut rows = Vec::new();
    let mut read_errors = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; CSV lines are 1-based.
        let line = idx + 2;
        match result {
            Ok(record) => rows.push(RawRow {
                line,
                fields: record.iter().map(str::to_string).collect(),
            }),
            Err(e) => read_errors.push(RowError {
                line,
                message: format!("CSV parse error: {e}"),
            }),
        }
    }

    Ok(RawTable {
        headers,
        rows,
        read_errors,
    })
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_lowercase()
}

/// The canonical fields every price source must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Date,
    Crop,
    Region,
    Price,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 4] = [
        CanonicalField::Date,
        CanonicalField::Crop,
        CanonicalField::Region,
        CanonicalField::Price,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::Date => "date",
            CanonicalField::Crop => "crop",
            CanonicalField::Region => "region",
            CanonicalField::Price => "price",
        }
    }

    /// Header substrings in priority order; earlier patterns win over later ones.
    fn patterns(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Date => &["date"],
            CanonicalField::Crop => &["commod", "crop"],
            CanonicalField::Region => &["state", "region"],
            CanonicalField::Price => &["modal", "price"],
        }
    }
}

/// Resolved column positions for the canonical fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub crop: usize,
    pub region: usize,
    pub price: usize,
}

/// Canonical fields no header matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingColumns(pub Vec<CanonicalField>);

impl std::fmt::Display for MissingColumns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|c| c.name()).collect();
        write!(f, "no column found for: {}", names.join(", "))
    }
}

impl From<MissingColumns> for PlanError {
    fn from(missing: MissingColumns) -> Self {
        PlanError::DataFormat(missing.to_string())
    }
}

/// Map arbitrary header names onto the canonical record shape.
pub struct SchemaMapping;

impl SchemaMapping {
    pub fn resolve(headers: &[String]) -> Result<ColumnMap, MissingColumns> {
        let mut found = [None; 4];
        let mut missing = Vec::new();

        for (slot, field) in found.iter_mut().zip(CanonicalField::ALL) {
            *slot = find_column(headers, field);
            if slot.is_none() {
                missing.push(field);
            }
        }

        match found {
            [Some(date), Some(crop), Some(region), Some(price)] => Ok(ColumnMap {
                date,
                crop,
                region,
                price,
            }),
            _ => Err(MissingColumns(missing)),
        }
    }
}

fn find_column(headers: &[String], field: CanonicalField) -> Option<usize> {
    field
        .patterns()
        .iter()
        .find_map(|pattern| headers.iter().position(|h| h.contains(pattern)))
}

/// Output of row normalization.
#[derive(Debug, Clone, Default)]
pub struct NormalizedRows {
    pub records: Vec<PriceRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Rows skipped because their region is outside the whitelist.
    pub dropped_regions: usize,
}

/// Convert raw rows to price records using a resolved column map.
pub fn normalize_rows(table: &RawTable, columns: ColumnMap, policy: RegionPolicy) -> NormalizedRows {
    let mut out = NormalizedRows {
        row_errors: table.read_errors.clone(),
        rows_read: table.rows.len() + table.read_errors.len(),
        ..NormalizedRows::default()
    };

    for row in &table.rows {
        match parse_row(row, columns, policy) {
            Ok(Some(record)) => out.records.push(record),
            Ok(None) => out.dropped_regions += 1,
            Err(message) => out.row_errors.push(RowError {
                line: row.line,
                message,
            }),
        }
    }

    out
}

fn parse_row(row: &RawRow, columns: ColumnMap, policy: RegionPolicy) -> Result<Option<PriceRecord>, String> {
    let crop = normalize_name(cell(row, columns.crop));
    if crop.is_empty() {
        return Err("Missing crop value.".to_string());
    }

    let mut region = normalize_name(cell(row, columns.region));
    if !is_known_region(&region) {
        match policy {
            RegionPolicy::Drop => return Ok(None),
            RegionPolicy::Unregioned => region.clear(),
        }
    }

    let price = parse_price(cell(row, columns.price))?;
    let date = parse_date(cell(row, columns.date))?;

    Ok(Some(PriceRecord {
        crop,
        region,
        date,
        price,
    }))
}

fn cell(row: &RawRow, idx: usize) -> &str {
    row.fields.get(idx).map(|s| s.trim()).unwrap_or("")
}

fn parse_price(s: &str) -> Result<f64, String> {
    if s.is_empty() {
        return Err("Missing price value.".to_string());
    }
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid price '{s}'."))?;
    if !v.is_finite() || v < 0.0 {
        return Err(format!("Invalid price '{s}' (must be finite and >= 0)."));
    }
    Ok(v)
}

/// Parse the date formats commonly found in market-price exports.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d-%b-%Y"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    // Month-granular stamps resolve to the first of the month.
    let month_only = [
        (format!("{s}-01"), "%Y-%m-%d"),
        (format!("01-{s}"), "%d-%b-%Y"),
        (format!("01/{s}"), "%d/%m/%Y"),
    ];
    for (padded, fmt) in &month_only {
        if let Ok(d) = NaiveDate::parse_from_str(padded, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected a day (YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD, DD-Mon-YYYY, \
         optionally with a time) or a month (YYYY-MM, Mon-YYYY, MM/YYYY)."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| normalize_header_name(n)).collect()
    }

    #[test]
    fn schema_prefers_modal_over_other_price_columns() {
        let h = headers(&["State", "District", "Commodity", "Min Price", "Max Price", "Modal Price", "Arrival_Date"]);
        let map = SchemaMapping::resolve(&h).unwrap();
        assert_eq!(map.region, 0);
        assert_eq!(map.crop, 2);
        assert_eq!(map.price, 5);
        assert_eq!(map.date, 6);
    }

    #[test]
    fn schema_falls_back_to_secondary_patterns() {
        let h = headers(&["crop_name", "region", "price_per_q", "obs_date"]);
        let map = SchemaMapping::resolve(&h).unwrap();
        assert_eq!(
            map,
            ColumnMap {
                date: 3,
                crop: 0,
                region: 1,
                price: 2
            }
        );
    }

    #[test]
    fn schema_reports_every_missing_field() {
        let h = headers(&["commodity", "value"]);
        let missing = SchemaMapping::resolve(&h).unwrap_err();
        assert_eq!(
            missing.0,
            vec![CanonicalField::Date, CanonicalField::Region, CanonicalField::Price]
        );
        let err: PlanError = missing.into();
        assert!(matches!(err, PlanError::DataFormat(ref m) if m.contains("date, region, price")));
    }

    #[test]
    fn bom_prefixed_header_is_normalized() {
        let csv = "\u{feff}Date,Commodity,State,Modal_Price\n2024-01-01,Rice,Goa,20\n";
        let table = read_csv_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.headers[0], "date");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].line, 2);
    }

    #[test]
    fn rows_are_normalized_and_bad_rows_reported() {
        let table = RawTable::new(
            ["date", "commodity", "state", "modal_price"],
            vec![
                vec!["2024-01-05", " Rice ", "GOA", "20.5"],
                vec!["2024-02-05", "rice", "goa", ""],
                vec!["not a date", "rice", "goa", "21"],
                vec!["2024-03-05", "rice", "atlantis", "22"],
                vec!["2024-03-05", "rice", "goa", "-4"],
            ],
        );
        let map = SchemaMapping::resolve(&table.headers).unwrap();
        let out = normalize_rows(&table, map, RegionPolicy::Drop);

        assert_eq!(out.rows_read, 5);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].crop, "rice");
        assert_eq!(out.records[0].region, "goa");
        assert_eq!(out.dropped_regions, 1);
        let lines: Vec<usize> = out.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4, 6]);
    }

    #[test]
    fn unregioned_policy_keeps_unknown_regions_blank() {
        let table = RawTable::new(
            ["date", "crop", "region", "price"],
            vec![vec!["2024-01-05", "wheat", "nowhere", "15"]],
        );
        let map = SchemaMapping::resolve(&table.headers).unwrap();
        let out = normalize_rows(&table, map, RegionPolicy::Unregioned);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].region, "");
        assert_eq!(out.dropped_regions, 0);
    }

    #[test]
    fn accepts_common_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 14).unwrap();
        for s in ["2023-07-14", "14/07/2023", "14-07-2023", "2023/07/14", "14-Jul-2023", "2023-07-14 00:00:00"] {
            assert_eq!(parse_date(s).unwrap(), expected, "format {s}");
        }
        assert!(parse_date("July 2023").is_err());
    }

    #[test]
    fn accepts_iso_timestamps_and_month_only_dates() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_date("2024-03-05T00:00:00").unwrap(), day);

        let first = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        for s in ["2024-03", "Mar-2024", "03/2024"] {
            assert_eq!(parse_date(s).unwrap(), first, "format {s}");
        }
        assert!(parse_date("2024-13").is_err());
        assert!(parse_date("13/2024").is_err());
    }
}
