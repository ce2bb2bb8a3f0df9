//! Spectrum tables (CSV).
//!
//! One row per pixel, one column per spectrum (flux, error, ...). An optional
//! `WAVE` column is kept aside on read so callers can check it against the
//! expected grid; on write the target grid's wavelengths always come first.
//!
//! Values are written with Rust's shortest round-trip formatting, so a
//! converted table can be converted back without loss.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::error::{AppError, EXIT_INPUT};

/// Name of the wavelength column.
pub const WAVE_COLUMN: &str = "WAVE";

/// Spectra read from or written to a CSV table.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumTable {
    /// Wavelength column, if the file had one.
    pub wave: Option<Vec<f64>>,
    /// Spectrum column names, in file order.
    pub names: Vec<String>,
    /// Spectrum columns, parallel to `names`.
    pub columns: Vec<Vec<f64>>,
}

impl SpectrumTable {
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }
}

/// Read a spectrum table.
pub fn read_spectrum_table(path: &Path) -> Result<SpectrumTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to open spectrum table '{}': {e}", path.display()),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let wave_idx = headers
        .iter()
        .position(|h| normalize_header_name(h).eq_ignore_ascii_case(WAVE_COLUMN));
    let names: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != wave_idx)
        .map(|(_, h)| normalize_header_name(h).to_string())
        .collect();

    if names.is_empty() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("Spectrum table '{}' has no spectrum columns.", path.display()),
        ));
    }

    let mut wave = wave_idx.map(|_| Vec::new());
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, header on line 1.
        let line = idx + 2;
        let record = result.map_err(|e| {
            AppError::new(EXIT_INPUT, format!("CSV parse error on line {line}: {e}"))
        })?;
        parse_row(&record, &headers, wave_idx, line, wave.as_mut(), &mut columns)?;
    }

    Ok(SpectrumTable {
        wave,
        names,
        columns,
    })
}

fn parse_row(
    record: &StringRecord,
    headers: &StringRecord,
    wave_idx: Option<usize>,
    line: usize,
    mut wave: Option<&mut Vec<f64>>,
    columns: &mut [Vec<f64>],
) -> Result<(), AppError> {
    let mut col = 0;
    for (idx, field) in record.iter().enumerate() {
        let value = parse_value(field).ok_or_else(|| {
            AppError::new(
                EXIT_INPUT,
                format!(
                    "Invalid value '{field}' in column `{}` on line {line}.",
                    headers.get(idx).unwrap_or("?")
                ),
            )
        })?;
        if Some(idx) == wave_idx {
            if let Some(w) = wave.as_mut() {
                w.push(value);
            }
        } else {
            columns[col].push(value);
            col += 1;
        }
    }
    Ok(())
}

fn parse_value(s: &str) -> Option<f64> {
    // NaN is a legitimate flux value (masked pixel); keep it.
    s.parse::<f64>().ok()
}

fn normalize_header_name(name: &str) -> &str {
    name.trim().trim_start_matches('\u{feff}')
}

/// Write a spectrum table with `wave` as the first column.
pub fn write_spectrum_table(
    path: &Path,
    wave: &[f64],
    names: &[String],
    columns: &[Vec<f64>],
) -> Result<(), AppError> {
    if names.len() != columns.len() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("{} column names for {} columns.", names.len(), columns.len()),
        ));
    }
    if let Some((name, col)) = names.iter().zip(columns).find(|(_, c)| c.len() != wave.len()) {
        return Err(AppError::new(
            EXIT_INPUT,
            format!(
                "Column `{name}` has {} rows but the wavelength grid has {}.",
                col.len(),
                wave.len()
            ),
        ));
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to create spectrum table '{}': {e}", path.display()),
        )
    })?;

    let header = std::iter::once(WAVE_COLUMN).chain(names.iter().map(String::as_str));
    writer
        .write_record(header)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write CSV header: {e}")))?;

    let mut row = Vec::with_capacity(names.len() + 1);
    for (i, w) in wave.iter().enumerate() {
        row.clear();
        row.push(w.to_string());
        row.extend(columns.iter().map(|c| c[i].to_string()));
        writer
            .write_record(&row)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to flush spectrum table: {e}")))?;
    Ok(())
}
