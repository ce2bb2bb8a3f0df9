use thiserror::Error;

/// Exit code for bad input (unreadable files, wrong array lengths).
pub const EXIT_INPUT: u8 = 2;

/// Exit code for inputs that parse but leave nothing to work on.
pub const EXIT_NO_DATA: u8 = 3;

/// Exit code for grid constants that do not line up.
pub const EXIT_GRID: u8 = 4;

/// Errors raised by the grid geometry and converter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// An input array does not have the length the grid requires.
    #[error("{what}: expected {expected} samples, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// The grid constants do not yield an exact apStar index for a chip boundary.
    #[error("grid constants inconsistent for {chip} chip: {detail}")]
    GridConstantInconsistency { chip: &'static str, detail: String },
}

impl GridError {
    pub fn shape(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<GridError> for AppError {
    fn from(err: GridError) -> Self {
        let exit_code = match err {
            GridError::ShapeMismatch { .. } => EXIT_INPUT,
            GridError::GridConstantInconsistency { .. } => EXIT_GRID,
        };
        Self::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_errors_map_to_exit_codes() {
        let shape: AppError = GridError::shape("apStar flux", 8575, 10).into();
        assert_eq!(shape.exit_code(), EXIT_INPUT);
        assert_eq!(shape.to_string(), "apStar flux: expected 8575 samples, got 10");

        let grid: AppError = GridError::GridConstantInconsistency {
            chip: "green",
            detail: "start off grid".to_string(),
        }
        .into();
        assert_eq!(grid.exit_code(), EXIT_GRID);
    }
}
