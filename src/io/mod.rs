//! Input/output helpers.
//!
//! - spectrum tables (CSV) (`spectrum`)
//! - grid constants JSON read/write (`grid`)
//! - results-table ingest for repeat statistics (`ingest`)
//! - JSON exports (`export`)

pub mod export;
pub mod grid;
pub mod ingest;
pub mod spectrum;

pub use export::*;
pub use grid::*;
pub use ingest::*;
pub use spectrum::*;
