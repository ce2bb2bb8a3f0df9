//! JSON exports.
//!
//! Every export shares one envelope so downstream scripts can tell files apart:
//!
//! ```json
//! {"tool": "aspcap", "kind": "repeat", "generated": "2025-01-01T12:00:00+00:00", "data": {...}}
//! ```

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, EXIT_INPUT};

/// Common envelope of JSON exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Export<T> {
    pub tool: String,
    pub kind: String,
    pub generated: DateTime<Local>,
    pub data: T,
}

impl<T> Export<T> {
    pub fn new(kind: impl Into<String>, data: T) -> Self {
        Self {
            tool: "aspcap".to_string(),
            kind: kind.into(),
            generated: Local::now(),
            data,
        }
    }
}

/// Write `data` wrapped in an [`Export`] envelope.
pub fn write_json_export<T: Serialize>(path: &Path, kind: &str, data: &T) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to create export JSON '{}': {e}", path.display()),
        )
    })?;
    serde_json::to_writer_pretty(file, &Export::new(kind, data))
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export JSON: {e}")))
}
