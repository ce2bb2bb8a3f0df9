//! Top-level application orchestration.
//!
//! `src/main.rs` is tiny; this module is the real main that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - resolves and validates the grid constants
//! - dispatches to the command handlers and prints their reports

use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, Command, ConvertArgs, GridArgs, RegistryArgs, RepeatArgs, WaveArgs};
use crate::domain::{ConvertConfig, Direction, RepeatConfig};
use crate::error::AppError;
use crate::grid::GridGeometry;
use crate::io::write_json_export;
use crate::registry::{element_order, parameter_order};
use crate::report::GridSummary;

pub mod pipeline;

/// Entry point for the `aspcap` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    crate::logging::init(cli.verbose);

    // Every command runs against a validated grid; bad constants stop here.
    let geometry = pipeline::load_geometry(cli.grid.as_deref())?;
    debug!(
        apstar = geometry.len(crate::domain::PixelSpace::ApStar),
        chip = geometry.len(crate::domain::PixelSpace::Chip),
        "grid validated"
    );

    match cli.command {
        Command::Params(args) => handle_params(&args),
        Command::Elems(args) => handle_elems(&args),
        Command::Grid(args) => handle_grid(&args, &geometry),
        Command::Wave(args) => handle_wave(&args, &geometry),
        Command::ToApstar(args) => handle_convert(&args, Direction::ToApStar, &geometry),
        Command::ToChip(args) => handle_convert(&args, Direction::ToChip, &geometry),
        Command::Repeat(args) => handle_repeat(&args),
    }
}

fn handle_params(args: &RegistryArgs) -> Result<(), AppError> {
    let order = parameter_order();
    print!("{}", crate::report::format_parameter_table(order));
    if let Some(path) = &args.json {
        write_json_export(path, "params", order)?;
    }
    Ok(())
}

fn handle_elems(args: &RegistryArgs) -> Result<(), AppError> {
    let order = element_order();
    print!("{}", crate::report::format_element_table(order));
    if let Some(path) = &args.json {
        write_json_export(path, "elems", order)?;
    }
    Ok(())
}

fn handle_grid(args: &GridArgs, geometry: &GridGeometry) -> Result<(), AppError> {
    let summary = GridSummary::from_geometry(geometry);
    println!("{}", crate::report::format_grid_summary(&summary));
    if let Some(path) = &args.json {
        write_json_export(path, "grid", &summary)?;
    }
    Ok(())
}

fn handle_wave(args: &WaveArgs, geometry: &GridGeometry) -> Result<(), AppError> {
    let n = pipeline::write_wavelengths(&args.output, geometry, args.space)?;
    println!("Wrote {n} wavelengths ({:?}) to {}", args.space, args.output.display());
    Ok(())
}

fn handle_convert(args: &ConvertArgs, direction: Direction, geometry: &GridGeometry) -> Result<(), AppError> {
    let config = convert_config_from_args(args, direction);
    let run = pipeline::run_conversion(&config, geometry)?;
    println!("{}", crate::report::format_conversion_summary(&run));
    Ok(())
}

fn handle_repeat(args: &RepeatArgs) -> Result<(), AppError> {
    let config = repeat_config_from_args(args);
    let run = pipeline::run_repeat(&config)?;
    println!("{}", crate::report::format_repeat_summary(&run.summary));
    if !run.ingest.row_errors.is_empty() {
        eprintln!(
            "Skipped {} of {} rows (run with -v for details).",
            run.ingest.row_errors.len(),
            run.ingest.rows_read
        );
    }
    Ok(())
}

pub fn convert_config_from_args(args: &ConvertArgs, direction: Direction) -> ConvertConfig {
    ConvertConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        direction,
    }
}

pub fn repeat_config_from_args(args: &RepeatArgs) -> RepeatConfig {
    RepeatConfig {
        input: args.input.clone(),
        export_json: args.json.clone(),
    }
}
