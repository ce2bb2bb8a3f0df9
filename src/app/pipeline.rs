//! Shared pipeline logic behind the CLI commands.
//!
//! Each function does the reading, computing and writing for one command and
//! returns what was done; printing is left to `app`.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::{ConvertConfig, Direction, GridConstants, PixelSpace, RepeatConfig};
use crate::error::{AppError, GridError};
use crate::grid::{GridConverter, GridGeometry};
use crate::io::{
    IngestedObservations, load_observations, read_grid_json, read_spectrum_table,
    write_json_export, write_spectrum_table,
};
use crate::stats::{RepeatSummary, summarize_repeats};

/// Environment variable naming a grid constants JSON.
pub const GRID_ENV: &str = "ASPCAP_GRID";

/// Relative tolerance when checking an input `WAVE` column against the grid.
const WAVE_RTOL: f64 = 1e-6;

/// Where the grid constants came from.
#[derive(Debug, Clone, PartialEq)]
pub enum GridSource {
    BuiltIn,
    File(PathBuf),
}

/// Resolve grid constants: explicit path, then `ASPCAP_GRID`, then APOGEE.
pub fn resolve_grid_constants(explicit: Option<&Path>) -> Result<(GridConstants, GridSource), AppError> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(GRID_ENV).map(PathBuf::from));

    match path {
        Some(path) => {
            let constants = read_grid_json(&path)?;
            Ok((constants, GridSource::File(path)))
        }
        None => Ok((GridConstants::APOGEE, GridSource::BuiltIn)),
    }
}

/// Resolve and validate the grid geometry used by every command.
pub fn load_geometry(explicit: Option<&Path>) -> Result<GridGeometry, AppError> {
    let (constants, source) = resolve_grid_constants(explicit)?;
    let geometry = GridGeometry::new(&constants)?;
    match &source {
        GridSource::BuiltIn => debug!("using built-in APOGEE grid"),
        GridSource::File(path) => info!(path = %path.display(), "using grid constants from file"),
    }
    Ok(geometry)
}

/// Outputs of a table conversion.
#[derive(Debug, Clone)]
pub struct ConversionRun {
    pub direction: Direction,
    pub columns: Vec<String>,
    pub rows_in: usize,
    pub rows_out: usize,
    pub output: PathBuf,
    /// Whether the input carried a `WAVE` column that matched the source grid.
    pub wave_matched: Option<bool>,
}

/// Convert every spectrum column of a table between pixel spaces.
pub fn run_conversion(config: &ConvertConfig, geometry: &GridGeometry) -> Result<ConversionRun, AppError> {
    let table = read_spectrum_table(&config.input)?;
    let source = config.direction.source_space();
    let target = config.direction.target_space();

    let rows_in = table.n_rows();
    let expected = geometry.len(source);
    if rows_in != expected {
        return Err(GridError::shape(
            format!("input table '{}' rows", config.input.display()),
            expected,
            rows_in,
        )
        .into());
    }

    let wave_matched = table
        .wave
        .as_deref()
        .map(|wave| wave_matches(wave, &geometry.wavelengths(source)));
    if wave_matched == Some(false) {
        warn!(
            input = %config.input.display(),
            "WAVE column does not match the {source:?} grid; values are placed by row index"
        );
    }

    let converter = GridConverter::new(geometry);
    let converted = converter.convert_many(config.direction, &table.columns)?;
    let wave = geometry.wavelengths(target);
    write_spectrum_table(&config.output, &wave, &table.names, &converted)?;

    info!(
        columns = table.names.len(),
        rows_in,
        rows_out = wave.len(),
        output = %config.output.display(),
        "conversion written"
    );

    Ok(ConversionRun {
        direction: config.direction,
        columns: table.names,
        rows_in,
        rows_out: wave.len(),
        output: config.output.clone(),
        wave_matched,
    })
}

/// Write the wavelength grid of `space` as a single-column table.
pub fn write_wavelengths(path: &Path, geometry: &GridGeometry, space: PixelSpace) -> Result<usize, AppError> {
    let wave = geometry.wavelengths(space);
    write_spectrum_table(path, &wave, &[], &[])?;
    Ok(wave.len())
}

fn wave_matches(wave: &[f64], expected: &[f64]) -> bool {
    wave.len() == expected.len()
        && wave
            .iter()
            .zip(expected)
            .all(|(w, e)| (w - e).abs() <= WAVE_RTOL * e.abs())
}

/// Outputs of a repeat-statistics run.
#[derive(Debug, Clone)]
pub struct RepeatRun {
    pub ingest: IngestedObservations,
    pub summary: RepeatSummary,
}

/// Load a results table and summarize the scatter of repeat observations.
pub fn run_repeat(config: &RepeatConfig) -> Result<RepeatRun, AppError> {
    let ingest = load_observations(&config.input)?;
    info!(
        rows = ingest.rows_read,
        observations = ingest.observations.len(),
        quantities = ingest.quantities.len(),
        "results table loaded"
    );

    let summary = summarize_repeats(&ingest.quantities, &ingest.observations);
    if let Some(path) = &config.export_json {
        write_json_export(path, "repeat", &summary)?;
    }

    Ok(RepeatRun { ingest, summary })
}
