//! apStar and chip wavelength grids and the pixel ranges that relate them.
//!
//! The apStar grid is one contiguous log-uniform array. The chip grids are three
//! shorter log-uniform arrays with the same step whose samples coincide with
//! apStar samples. Between chips the apStar grid has detector gaps.
//!
//! Chip boundaries are located in closed form,
//! `round((logw0_chip - logw0) / dlogw)`, and then verified: the apStar sample
//! at that index must match the boundary to within [`LOG_MATCH_ATOL`]. A
//! boundary that falls between samples is rejected rather than snapped to the
//! nearest one.

use std::sync::OnceLock;

use tracing::debug;

use crate::domain::{Chip, GridConstants, PixelRange, PixelSpace};
use crate::error::GridError;
use crate::math::{LOG_MATCH_ATOL, grid_offset, log_uniform, log_wave};

/// Validated grid constants with precomputed chip ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry {
    constants: GridConstants,
    apstar_ranges: [PixelRange; 3],
    chip_ranges: [PixelRange; 3],
}

impl GridGeometry {
    /// Validate `constants` and compute chip ranges in both pixel spaces.
    pub fn new(constants: &GridConstants) -> Result<Self, GridError> {
        check_scalars(constants)?;

        let mut apstar_ranges = [PixelRange::new(0, 0); 3];
        let mut chip_ranges = [PixelRange::new(0, 0); 3];
        let mut offset = 0;

        for chip in Chip::ALL {
            let k = chip.index();
            let c = constants.chip(chip);
            let start = locate(constants, chip, c.logw0, "start")?;
            let end = locate(
                constants,
                chip,
                log_wave(c.logw0, constants.dlogw, c.nw),
                "end",
            )?;

            if end - start != c.nw {
                return Err(inconsistent(
                    chip,
                    format!(
                        "apStar range [{start}, {end}) holds {} samples but the chip has {}",
                        end - start,
                        c.nw
                    ),
                ));
            }
            if k > 0 && start < apstar_ranges[k - 1].end {
                return Err(inconsistent(
                    chip,
                    format!(
                        "starts at apStar pixel {start}, inside the preceding chip (ends at {})",
                        apstar_ranges[k - 1].end
                    ),
                ));
            }

            apstar_ranges[k] = PixelRange::new(start, end);
            chip_ranges[k] = PixelRange::new(offset, offset + c.nw);
            offset += c.nw;

            debug!(
                chip = chip.name(),
                apstar = %apstar_ranges[k],
                local = %chip_ranges[k],
                "chip range"
            );
        }

        Ok(Self {
            constants: *constants,
            apstar_ranges,
            chip_ranges,
        })
    }

    /// Geometry for [`GridConstants::APOGEE`], validated once per process.
    pub fn apogee() -> Result<&'static GridGeometry, GridError> {
        static APOGEE: OnceLock<Result<GridGeometry, GridError>> = OnceLock::new();
        APOGEE
            .get_or_init(|| GridGeometry::new(&GridConstants::APOGEE))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn constants(&self) -> &GridConstants {
        &self.constants
    }

    /// Number of samples of a full spectrum in `space`.
    pub fn len(&self, space: PixelSpace) -> usize {
        match space {
            PixelSpace::ApStar => self.constants.nw_apstar,
            PixelSpace::Chip => self.constants.nw_aspcap(),
        }
    }

    /// apStar wavelengths (Angstrom).
    pub fn apstar_wavelengths(&self) -> Vec<f64> {
        log_uniform(
            self.constants.logw0,
            self.constants.dlogw,
            self.constants.nw_apstar,
        )
    }

    /// Chip wavelengths (Angstrom), blue, green, red.
    pub fn chip_wavelengths(&self) -> [Vec<f64>; 3] {
        Chip::ALL.map(|chip| {
            let c = self.constants.chip(chip);
            log_uniform(c.logw0, self.constants.dlogw, c.nw)
        })
    }

    /// Wavelengths of a full spectrum in `space`; chips are concatenated.
    pub fn wavelengths(&self, space: PixelSpace) -> Vec<f64> {
        match space {
            PixelSpace::ApStar => self.apstar_wavelengths(),
            PixelSpace::Chip => self.chip_wavelengths().concat(),
        }
    }

    /// Half-open chip ranges, blue, green, red.
    pub fn chip_ranges(&self, space: PixelSpace) -> [PixelRange; 3] {
        match space {
            PixelSpace::ApStar => self.apstar_ranges,
            PixelSpace::Chip => self.chip_ranges,
        }
    }

    pub fn chip_range(&self, chip: Chip, space: PixelSpace) -> PixelRange {
        self.chip_ranges(space)[chip.index()]
    }

    /// apStar pixel ranges not covered by any chip, in increasing order.
    pub fn gaps(&self) -> Vec<PixelRange> {
        let mut out = Vec::with_capacity(4);
        let mut cursor = 0;
        for r in self.apstar_ranges {
            if r.start > cursor {
                out.push(PixelRange::new(cursor, r.start));
            }
            cursor = r.end;
        }
        if cursor < self.constants.nw_apstar {
            out.push(PixelRange::new(cursor, self.constants.nw_apstar));
        }
        out
    }
}

fn check_scalars(c: &GridConstants) -> Result<(), GridError> {
    let grid_err = |detail: String| GridError::GridConstantInconsistency {
        chip: "apStar",
        detail,
    };
    if !(c.logw0.is_finite() && c.dlogw.is_finite() && c.dlogw > 0.0) {
        return Err(grid_err(format!(
            "logw0={} and dlogw={} must be finite with dlogw > 0",
            c.logw0, c.dlogw
        )));
    }
    if c.nw_apstar == 0 {
        return Err(grid_err("apStar grid has no samples".to_string()));
    }
    for chip in Chip::ALL {
        let cc = c.chip(chip);
        if !cc.logw0.is_finite() || cc.nw == 0 {
            return Err(inconsistent(
                chip,
                format!("logw0={} nw={} (need finite logw0, nw > 0)", cc.logw0, cc.nw),
            ));
        }
    }
    Ok(())
}

/// apStar index of the sample at log10 wavelength `log_target`.
fn locate(
    c: &GridConstants,
    chip: Chip,
    log_target: f64,
    which: &str,
) -> Result<usize, GridError> {
    let off = grid_offset(c.logw0, c.dlogw, log_target);
    if !off.is_exact() {
        return Err(inconsistent(
            chip,
            format!(
                "{which} log10(wave)={log_target} is {:e} from the nearest apStar sample (tolerance {LOG_MATCH_ATOL:e})",
                off.residual.abs()
            ),
        ));
    }
    match usize::try_from(off.index) {
        Ok(i) if i < c.nw_apstar => Ok(i),
        _ => Err(inconsistent(
            chip,
            format!(
                "{which} log10(wave)={log_target} maps to apStar pixel {} outside [0, {})",
                off.index, c.nw_apstar
            ),
        )),
    }
}

fn inconsistent(chip: Chip, detail: String) -> GridError {
    GridError::GridConstantInconsistency {
        chip: chip.name(),
        detail,
    }
}

/// apStar wavelengths for the APOGEE constants.
pub fn apstar_wavelengths() -> Vec<f64> {
    let c = GridConstants::APOGEE;
    log_uniform(c.logw0, c.dlogw, c.nw_apstar)
}

/// Chip wavelengths for the APOGEE constants.
pub fn chip_wavelengths() -> [Vec<f64>; 3] {
    let c = GridConstants::APOGEE;
    c.chips.map(|cc| log_uniform(cc.logw0, c.dlogw, cc.nw))
}

/// Chip ranges for the APOGEE constants in `space`.
pub fn chip_index_ranges(space: PixelSpace) -> Result<[PixelRange; 3], GridError> {
    Ok(GridGeometry::apogee()?.chip_ranges(space))
}
