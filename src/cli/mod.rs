//! Command-line parsing for the ASPCAP wavelength-grid tool.
//!
//! Argument parsing stays here; `app` turns the parsed arguments into typed
//! configs and dispatches.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::PixelSpace;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "aspcap",
    version,
    about = "APOGEE wavelength grids: apStar <-> ASPCAP chip conversion, parameter/element registry"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `ASPCAP_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Grid constants JSON (defaults to `ASPCAP_GRID`, then the built-in APOGEE grid).
    #[arg(long, value_name = "JSON", global = true)]
    pub grid: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the stellar parameter order.
    Params(RegistryArgs),
    /// Print the element abundance order.
    Elems(RegistryArgs),
    /// Validate the grid constants and print chip ranges, gaps and wavelength bounds.
    Grid(GridArgs),
    /// Write the wavelength grid of one pixel space as CSV.
    Wave(WaveArgs),
    /// Convert a chip-space (ASPCAP) spectrum table to the apStar grid.
    ToApstar(ConvertArgs),
    /// Convert an apStar spectrum table to chip space (ASPCAP).
    ToChip(ConvertArgs),
    /// Scatter of repeat observations of the same star.
    Repeat(RepeatArgs),
}

/// Options for the registry listings.
#[derive(Debug, Args, Clone)]
pub struct RegistryArgs {
    /// Also write the order as JSON.
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

/// Options for `grid`.
#[derive(Debug, Args, Clone)]
pub struct GridArgs {
    /// Also write the grid summary as JSON.
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

/// Options for `wave`.
#[derive(Debug, Args, Clone)]
pub struct WaveArgs {
    /// Output CSV.
    #[arg(short, long, value_name = "CSV")]
    pub output: PathBuf,

    /// Pixel space of the grid.
    #[arg(long, value_enum, default_value_t = PixelSpace::ApStar)]
    pub space: PixelSpace,
}

/// Options for table conversion.
#[derive(Debug, Args, Clone)]
pub struct ConvertArgs {
    /// Input spectrum table (CSV, one row per pixel).
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Output spectrum table.
    #[arg(short, long, value_name = "CSV")]
    pub output: PathBuf,
}

/// Options for `repeat`.
#[derive(Debug, Args, Clone)]
pub struct RepeatArgs {
    /// Results table with one row per observation.
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    /// Also write the statistics as JSON.
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_conversion_with_global_flags() {
        let cli = Cli::parse_from([
            "aspcap", "to-apstar", "-i", "in.csv", "-o", "out.csv", "-vv", "--grid", "g.json",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.grid, Some(PathBuf::from("g.json")));
        match cli.command {
            Command::ToApstar(args) => {
                assert_eq!(args.input, PathBuf::from("in.csv"));
                assert_eq!(args.output, PathBuf::from("out.csv"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn wave_space_defaults_to_apstar() {
        let cli = Cli::parse_from(["aspcap", "wave", "--output", "w.csv"]);
        match cli.command {
            Command::Wave(args) => assert_eq!(args.space, PixelSpace::ApStar),
            other => panic!("unexpected command: {other:?}"),
        }
        let cli = Cli::parse_from(["aspcap", "wave", "-o", "w.csv", "--space", "chip"]);
        match cli.command {
            Command::Wave(args) => assert_eq!(args.space, PixelSpace::Chip),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
