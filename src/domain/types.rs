//! Shared domain types.
//!
//! These types are intentionally small and serializable so they can be:
//!
//! - passed by reference through geometry and conversion code
//! - loaded from / exported to JSON
//! - selected from the command line (`ValueEnum`)

use std::ops::Range;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One of the three spectrograph detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chip {
    Blue,
    Green,
    Red,
}

impl Chip {
    /// Detector order, shortest wavelengths first.
    pub const ALL: [Chip; 3] = [Chip::Blue, Chip::Green, Chip::Red];

    pub fn index(self) -> usize {
        match self {
            Chip::Blue => 0,
            Chip::Green => 1,
            Chip::Red => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Chip::Blue => "blue",
            Chip::Green => "green",
            Chip::Red => "red",
        }
    }
}

/// Pixel coordinate system used when asking for chip ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PixelSpace {
    /// Indices into the contiguous apStar array (with detector gaps).
    #[value(name = "apstar")]
    ApStar,
    /// Indices into the concatenated chip (ASPCAP) array.
    Chip,
}

/// Half-open pixel range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRange {
    pub start: usize,
    pub end: usize,
}

impl PixelRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn overlaps(&self, other: &PixelRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for PixelRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Log-uniform origin and length of one chip grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChipConstants {
    /// log10 of the first wavelength (Angstrom).
    pub logw0: f64,
    /// Number of samples.
    pub nw: usize,
}

/// Fixed constants describing the apStar and chip wavelength grids.
///
/// Geometry code never reads globals; it takes a `&GridConstants` (usually
/// [`GridConstants::APOGEE`]) and validates it once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConstants {
    /// log10 of the first apStar wavelength (Angstrom).
    pub logw0: f64,
    /// Common log10 step of every grid.
    pub dlogw: f64,
    /// Number of apStar samples.
    pub nw_apstar: usize,
    /// Blue, green and red chip grids.
    pub chips: [ChipConstants; 3],
}

impl GridConstants {
    /// The APOGEE apStar / ASPCAP grids.
    pub const APOGEE: GridConstants = GridConstants {
        logw0: 4.179,
        dlogw: 6.0e-6,
        nw_apstar: 8575,
        chips: [
            ChipConstants { logw0: 4.180476, nw: 3028 },
            ChipConstants { logw0: 4.200510, nw: 2495 },
            ChipConstants { logw0: 4.217064, nw: 1991 },
        ],
    };

    pub fn chip(&self, chip: Chip) -> &ChipConstants {
        &self.chips[chip.index()]
    }

    /// Total number of chip samples (length of the concatenated ASPCAP array).
    pub fn nw_aspcap(&self) -> usize {
        self.chips.iter().map(|c| c.nw).sum()
    }
}

impl Default for GridConstants {
    fn default() -> Self {
        Self::APOGEE
    }
}

/// Per-chip sample arrays (flux, errors, masks, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct ChipFlux<T> {
    pub chips: [Vec<T>; 3],
}

impl<T: Copy> ChipFlux<T> {
    pub fn new(blue: Vec<T>, green: Vec<T>, red: Vec<T>) -> Self {
        Self {
            chips: [blue, green, red],
        }
    }

    pub fn chip(&self, chip: Chip) -> &[T] {
        &self.chips[chip.index()]
    }

    /// Lengths in blue, green, red order.
    pub fn lens(&self) -> [usize; 3] {
        [self.chips[0].len(), self.chips[1].len(), self.chips[2].len()]
    }

    /// Flatten into the concatenated chip-local layout.
    pub fn concatenated(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.lens().iter().sum());
        for chip in &self.chips {
            out.extend_from_slice(chip);
        }
        out
    }
}

/// Telescope an observation was taken with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Telescope {
    Apo1m,
    Apo25m,
    Lco25m,
}

impl Telescope {
    pub const ALL: [Telescope; 3] = [Telescope::Apo1m, Telescope::Apo25m, Telescope::Lco25m];

    pub fn name(self) -> &'static str {
        match self {
            Telescope::Apo1m => "apo1m",
            Telescope::Apo25m => "apo25m",
            Telescope::Lco25m => "lco25m",
        }
    }

    /// Exact (case-insensitive) telescope name.
    pub fn parse(s: &str) -> Option<Telescope> {
        let s = s.trim();
        Self::ALL.into_iter().find(|t| t.name().eq_ignore_ascii_case(s))
    }

    /// First telescope name found inside a field name such as `M67_apo25m`.
    pub fn from_field(field: &str) -> Option<Telescope> {
        let lower = field.to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| lower.contains(t.name()))
    }
}

/// Direction of a spectrum conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Chip (ASPCAP) grid to apStar grid.
    ToApStar,
    /// apStar grid to chip (ASPCAP) grid.
    ToChip,
}

impl Direction {
    pub fn source_space(self) -> PixelSpace {
        match self {
            Direction::ToApStar => PixelSpace::Chip,
            Direction::ToChip => PixelSpace::ApStar,
        }
    }

    pub fn target_space(self) -> PixelSpace {
        match self {
            Direction::ToApStar => PixelSpace::ApStar,
            Direction::ToChip => PixelSpace::Chip,
        }
    }
}

/// Configuration of a table conversion run, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub direction: Direction,
}

/// Configuration of a repeat-observation statistics run.
#[derive(Debug, Clone)]
pub struct RepeatConfig {
    pub input: PathBuf,
    pub export_json: Option<PathBuf>,
}
