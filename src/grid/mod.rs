//! Wavelength grids and spectrum conversion.
//!
//! Responsibilities:
//!
//! - build the apStar and chip wavelength grids
//! - locate and validate chip ranges in both pixel spaces
//! - move sample arrays between the two layouts

pub mod convert;
pub mod geometry;

pub use convert::*;
pub use geometry::*;
