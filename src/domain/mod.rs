//! Domain types used throughout the toolkit.
//!
//! This module defines:
//!
//! - detector and pixel-space enums (`Chip`, `PixelSpace`, `PixelRange`)
//! - grid constants (`GridConstants`, `ChipConstants`)
//! - per-chip arrays (`ChipFlux`)
//! - run configuration (`ConvertConfig`, `RepeatConfig`)

pub mod types;

pub use types::*;
