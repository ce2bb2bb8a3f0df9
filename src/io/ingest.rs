//! CSV ingest of per-observation result tables.
//!
//! Turns a results table into `Observation`s for repeat statistics:
//!
//! - `APOGEE_ID` (required) identifies the star
//! - `TELESCOPE` (exact name) identifies the telescope; without it, the first
//!   telescope name inside `ALTFIELD` / `FIELD` is used
//! - parameter tag columns (`TEFF`, `LOGG`, ...) and element symbol columns
//!   (`Mg`, `TiII`, ...) hold the measured values
//!
//! Header matching is exact after trimming (element symbols are case
//! sensitive: `CI` and `Ci` are different things). Bad rows are skipped and
//! reported; a table with no usable rows is an error.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tracing::warn;

use crate::domain::Telescope;
use crate::error::{AppError, EXIT_INPUT, EXIT_NO_DATA};
use crate::stats::{Observation, Quantity, repeat_quantities};

const ID_COLUMN: &str = "APOGEE_ID";
const TELESCOPE_COLUMN: &str = "TELESCOPE";
const FIELD_COLUMNS: [&str; 2] = ["ALTFIELD", "FIELD"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Ingest output: the quantities found, the observations, and row errors.
#[derive(Debug, Clone)]
pub struct IngestedObservations {
    pub quantities: Vec<Quantity>,
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load observations from a results CSV.
pub fn load_observations(path: &Path) -> Result<IngestedObservations, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to open results CSV '{}': {e}", path.display()),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    if !header_map.contains_key(ID_COLUMN) {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("Missing required column: `{ID_COLUMN}`"),
        ));
    }

    let quantities: Vec<Quantity> = repeat_quantities()
        .into_iter()
        .filter(|q| header_map.contains_key(q.name.as_str()))
        .collect();
    if quantities.is_empty() {
        return Err(AppError::new(
            EXIT_INPUT,
            "No parameter (TEFF, LOGG, ...) or element (C, Mg, ...) columns found.",
        ));
    }

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map, &quantities) {
            Ok(obs) => observations.push(obs),
            Err(message) => row_errors.push(RowError {
                line,
                id: get_optional(&record, &header_map, ID_COLUMN).map(str::to_string),
                message,
            }),
        }
    }

    for e in &row_errors {
        warn!(line = e.line, id = e.id.as_deref().unwrap_or(""), "{}", e.message);
    }

    if observations.is_empty() {
        return Err(AppError::new(
            EXIT_NO_DATA,
            format!("No valid rows in '{}'.", path.display()),
        ));
    }

    Ok(IngestedObservations {
        quantities,
        observations,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Strip a UTF-8 BOM on the first header so the ID column is still found.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    quantities: &[Quantity],
) -> Result<Observation, String> {
    let star = get_required(record, header_map, ID_COLUMN)?.to_string();
    let telescope = match get_optional(record, header_map, TELESCOPE_COLUMN) {
        Some(name) => Telescope::parse(name),
        None => FIELD_COLUMNS
            .iter()
            .filter_map(|col| get_optional(record, header_map, col))
            .find_map(Telescope::from_field),
    };

    let values = quantities
        .iter()
        .map(|q| parse_opt_f64(get_optional(record, header_map, &q.name)).unwrap_or(f64::NAN))
        .collect();

    Ok(Observation {
        star,
        telescope,
        values,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?;
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
