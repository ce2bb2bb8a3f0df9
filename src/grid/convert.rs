//! Conversion of sample arrays between the apStar grid and the chip grid.
//!
//! Conversion is pure index remapping: values are copied, never inspected, so
//! NaN or negative flux passes through unchanged. apStar pixels outside every
//! chip range are filled with `T::default()` (`0.0` for flux).

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{Chip, ChipFlux, Direction, PixelSpace};
use crate::error::GridError;
use crate::grid::geometry::GridGeometry;

/// Converter bound to a validated geometry.
#[derive(Debug, Clone, Copy)]
pub struct GridConverter<'g> {
    geometry: &'g GridGeometry,
}

impl<'g> GridConverter<'g> {
    pub fn new(geometry: &'g GridGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &'g GridGeometry {
        self.geometry
    }

    /// Place three chip arrays onto the apStar grid.
    pub fn chip_to_apstar<T: Copy + Default>(&self, flux: &ChipFlux<T>) -> Result<Vec<T>, GridError> {
        let constants = self.geometry.constants();
        for chip in Chip::ALL {
            let expected = constants.chip(chip).nw;
            let actual = flux.chip(chip).len();
            if actual != expected {
                return Err(GridError::shape(
                    format!("{} chip flux", chip.name()),
                    expected,
                    actual,
                ));
            }
        }

        let mut out = vec![T::default(); constants.nw_apstar];
        for chip in Chip::ALL {
            let range = self.geometry.chip_range(chip, PixelSpace::ApStar);
            out[range.as_range()].copy_from_slice(flux.chip(chip));
        }
        Ok(out)
    }

    /// Cut the three chip arrays out of an apStar array.
    pub fn apstar_to_chip<T: Copy>(&self, apstar: &[T]) -> Result<ChipFlux<T>, GridError> {
        self.check_len(apstar, PixelSpace::ApStar, "apStar flux")?;
        let chips = self
            .geometry
            .chip_ranges(PixelSpace::ApStar)
            .map(|range| apstar[range.as_range()].to_vec());
        Ok(ChipFlux { chips })
    }

    /// Split a concatenated chip (ASPCAP) array into its three chips.
    pub fn split_aspcap<T: Copy>(&self, aspcap: &[T]) -> Result<ChipFlux<T>, GridError> {
        self.check_len(aspcap, PixelSpace::Chip, "ASPCAP flux")?;
        let chips = self
            .geometry
            .chip_ranges(PixelSpace::Chip)
            .map(|range| aspcap[range.as_range()].to_vec());
        Ok(ChipFlux { chips })
    }

    /// Concatenated chip array to apStar array.
    pub fn aspcap_to_apstar<T: Copy + Default>(&self, aspcap: &[T]) -> Result<Vec<T>, GridError> {
        self.chip_to_apstar(&self.split_aspcap(aspcap)?)
    }

    /// apStar array to concatenated chip array.
    pub fn apstar_to_aspcap<T: Copy>(&self, apstar: &[T]) -> Result<Vec<T>, GridError> {
        self.check_len(apstar, PixelSpace::ApStar, "apStar flux")?;
        let mut out = Vec::with_capacity(self.geometry.len(PixelSpace::Chip));
        for range in self.geometry.chip_ranges(PixelSpace::ApStar) {
            out.extend_from_slice(&apstar[range.as_range()]);
        }
        Ok(out)
    }

    /// Convert one full spectrum in the given direction.
    pub fn convert<T: Copy + Default>(&self, direction: Direction, data: &[T]) -> Result<Vec<T>, GridError> {
        match direction {
            Direction::ToApStar => self.aspcap_to_apstar(data),
            Direction::ToChip => self.apstar_to_aspcap(data),
        }
    }

    /// Convert many spectra (flux, error, ...) in parallel.
    ///
    /// Output order matches input order. A column with the wrong length is
    /// reported by its index.
    pub fn convert_many<T>(&self, direction: Direction, columns: &[Vec<T>]) -> Result<Vec<Vec<T>>, GridError>
    where
        T: Copy + Default + Send + Sync,
    {
        debug!(
            columns = columns.len(),
            ?direction,
            "converting spectra"
        );
        columns
            .par_iter()
            .enumerate()
            .map(|(i, col)| {
                self.convert(direction, col).map_err(|err| match err {
                    GridError::ShapeMismatch {
                        what,
                        expected,
                        actual,
                    } => GridError::ShapeMismatch {
                        what: format!("column {i} ({what})"),
                        expected,
                        actual,
                    },
                    other => other,
                })
            })
            .collect()
    }

    fn check_len<T>(&self, data: &[T], space: PixelSpace, what: &str) -> Result<(), GridError> {
        let expected = self.geometry.len(space);
        if data.len() != expected {
            return Err(GridError::shape(what, expected, data.len()));
        }
        Ok(())
    }
}

/// Place three chip arrays onto the APOGEE apStar grid.
pub fn chip_to_apstar<T: Copy + Default>(flux: &ChipFlux<T>) -> Result<Vec<T>, GridError> {
    GridConverter::new(GridGeometry::apogee()?).chip_to_apstar(flux)
}

/// Cut the three chip arrays out of an APOGEE apStar array.
pub fn apstar_to_chip<T: Copy>(apstar: &[T]) -> Result<ChipFlux<T>, GridError> {
    GridConverter::new(GridGeometry::apogee()?).apstar_to_chip(apstar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ones() -> ChipFlux<f64> {
        ChipFlux::new(vec![1.0; 3028], vec![1.0; 2495], vec![1.0; 1991])
    }

    fn ramp() -> ChipFlux<f64> {
        let mut next = 0.0;
        let mut chip = |n: usize| -> Vec<f64> {
            (0..n)
                .map(|_| {
                    next += 1.0;
                    next
                })
                .collect()
        };
        ChipFlux::new(chip(3028), chip(2495), chip(1991))
    }

    #[test]
    fn ones_fill_three_blocks() {
        let out = chip_to_apstar(&ones()).unwrap();
        assert_eq!(out.len(), 8575);
        assert_eq!(out.iter().filter(|&&v| v == 1.0).count(), 7514);
        assert_eq!(out.iter().filter(|&&v| v == 0.0).count(), 1061);

        // Count transitions into a block of ones.
        let blocks = out
            .windows(2)
            .filter(|w| w[0] == 0.0 && w[1] == 1.0)
            .count();
        assert_eq!(blocks, 3);
    }

    #[test]
    fn gaps_are_exactly_zero() {
        let geometry = GridGeometry::apogee().unwrap();
        let out = chip_to_apstar(&ramp()).unwrap();
        for gap in geometry.gaps() {
            assert!(out[gap.as_range()].iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn round_trip_preserves_chips() {
        let input = ramp();
        let back = apstar_to_chip(&chip_to_apstar(&input).unwrap()).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn nan_and_negative_values_pass_through() {
        let mut input = ones();
        input.chips[0][0] = f64::NAN;
        input.chips[2][10] = -5.0;
        let out = chip_to_apstar(&input).unwrap();
        assert!(out[246].is_nan());
        assert_eq!(out[6344 + 10], -5.0);
    }

    #[test]
    fn wrong_chip_length_is_rejected() {
        let input = ChipFlux::new(vec![1.0; 3028], vec![1.0; 2494], vec![1.0; 1991]);
        let err = chip_to_apstar(&input).unwrap_err();
        assert_eq!(err, GridError::shape("green chip flux", 2495, 2494));
    }

    #[test]
    fn wrong_apstar_length_is_rejected() {
        let err = apstar_to_chip(&[0.0f64; 100]).unwrap_err();
        assert_eq!(err, GridError::shape("apStar flux", 8575, 100));
    }

    #[test]
    fn concatenated_layout_matches_chip_layout() {
        let geometry = GridGeometry::apogee().unwrap();
        let conv = GridConverter::new(geometry);
        let input = ramp();
        let flat = input.concatenated();

        let apstar = conv.aspcap_to_apstar(&flat).unwrap();
        assert_eq!(apstar, conv.chip_to_apstar(&input).unwrap());
        assert_eq!(conv.apstar_to_aspcap(&apstar).unwrap(), flat);
    }

    #[test]
    fn bitmasks_convert_like_flux() {
        let conv = GridConverter::new(GridGeometry::apogee().unwrap());
        let mask = ChipFlux::new(vec![4u32; 3028], vec![8u32; 2495], vec![16u32; 1991]);
        let apstar = conv.chip_to_apstar(&mask).unwrap();
        assert_eq!(apstar[0], 0);
        assert_eq!(apstar[246], 4);
        assert_eq!(apstar[3585], 8);
        assert_eq!(apstar[8334], 16);
        assert_eq!(apstar[8335], 0);
    }

    #[test]
    fn convert_many_keeps_order_and_reports_bad_column() {
        let conv = GridConverter::new(GridGeometry::apogee().unwrap());
        let flux = ramp().concatenated();
        let err: Vec<f64> = flux.iter().map(|v| v * 0.01).collect();

        let out = conv
            .convert_many(Direction::ToApStar, &[flux.clone(), err.clone()])
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0][246], flux[0]);
        assert_eq!(out[1][246], err[0]);

        let bad = conv
            .convert_many(Direction::ToApStar, &[flux, vec![0.0; 10]])
            .unwrap_err();
        assert_eq!(
            bad,
            GridError::shape("column 1 (ASPCAP flux)", 7514, 10)
        );
    }
}
