//! `aspcap-grid` library crate.
//!
//! APOGEE wavelength grids and the ASPCAP parameter/element registry:
//!
//! - `grid`: apStar and chip wavelength grids, chip index ranges, and
//!   conversion of per-pixel arrays between the two layouts
//! - `registry`: canonical order of stellar parameters and element abundances
//! - `stats`: scatter of repeat observations of the same star
//!
//! The binary (`aspcap`) is a thin wrapper so the core stays testable without
//! spawning processes.

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod grid;
pub mod io;
pub mod logging;
pub mod math;
pub mod registry;
pub mod report;
pub mod stats;
