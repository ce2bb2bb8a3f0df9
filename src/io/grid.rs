//! Read/write grid constants JSON files.
//!
//! The schema is `domain::GridConstants`:
//!
//! ```json
//! {"logw0": 4.179, "dlogw": 6e-6, "nw_apstar": 8575,
//!  "chips": [{"logw0": 4.180476, "nw": 3028}, ...]}
//! ```
//!
//! Reading only parses; `GridGeometry::new` decides whether the constants line up.

use std::fs::File;
use std::path::Path;

use crate::domain::GridConstants;
use crate::error::{AppError, EXIT_INPUT};

/// Read grid constants from JSON.
pub fn read_grid_json(path: &Path) -> Result<GridConstants, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to open grid JSON '{}': {e}", path.display()),
        )
    })?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid grid JSON '{}': {e}", path.display())))
}

/// Write grid constants as pretty JSON.
pub fn write_grid_json(path: &Path, constants: &GridConstants) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to create grid JSON '{}': {e}", path.display()),
        )
    })?;
    serde_json::to_writer_pretty(file, constants)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write grid JSON: {e}")))
}
