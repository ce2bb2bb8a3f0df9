//! Mathematical utilities: log-uniform grids and on-grid tests.

pub mod loggrid;

pub use loggrid::*;
