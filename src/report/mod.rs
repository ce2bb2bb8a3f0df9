//! Reporting: serializable summaries and formatted terminal output.

pub mod format;

pub use format::*;

use serde::Serialize;

use crate::domain::{Chip, GridConstants, PixelRange, PixelSpace};
use crate::grid::GridGeometry;

/// Wavelength coverage and pixel ranges of one chip.
#[derive(Debug, Clone, Serialize)]
pub struct ChipSummary {
    pub chip: Chip,
    pub apstar: PixelRange,
    pub local: PixelRange,
    /// First and last wavelength (Angstrom).
    pub wave_min: f64,
    pub wave_max: f64,
}

/// Everything worth knowing about a validated geometry.
#[derive(Debug, Clone, Serialize)]
pub struct GridSummary {
    pub constants: GridConstants,
    pub apstar_wave_min: f64,
    pub apstar_wave_max: f64,
    pub chips: Vec<ChipSummary>,
    /// apStar pixels covered by no chip.
    pub gaps: Vec<PixelRange>,
}

impl GridSummary {
    pub fn from_geometry(geometry: &GridGeometry) -> Self {
        let apstar = geometry.apstar_wavelengths();
        let chip_waves = geometry.chip_wavelengths();
        let chips = Chip::ALL
            .into_iter()
            .map(|chip| {
                let w = &chip_waves[chip.index()];
                ChipSummary {
                    chip,
                    apstar: geometry.chip_range(chip, PixelSpace::ApStar),
                    local: geometry.chip_range(chip, PixelSpace::Chip),
                    wave_min: w.first().copied().unwrap_or(f64::NAN),
                    wave_max: w.last().copied().unwrap_or(f64::NAN),
                }
            })
            .collect();

        Self {
            constants: *geometry.constants(),
            apstar_wave_min: apstar.first().copied().unwrap_or(f64::NAN),
            apstar_wave_max: apstar.last().copied().unwrap_or(f64::NAN),
            chips,
            gaps: geometry.gaps(),
        }
    }
}
