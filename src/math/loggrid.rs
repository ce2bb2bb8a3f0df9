//! Log-uniform wavelength sampling.
//!
//! Every APOGEE grid is `wave(i) = 10^(logw0 + i * dlogw)`. The exponent is
//! always evaluated as `logw0 + (i as f64) * dlogw` so two grids with the same
//! origin produce bit-identical samples.

/// Absolute tolerance (in log10 wavelength) for a boundary to count as on-grid.
pub const LOG_MATCH_ATOL: f64 = 1e-8;

/// log10 wavelength of sample `i`.
pub fn log_wave(logw0: f64, dlogw: f64, i: usize) -> f64 {
    logw0 + (i as f64) * dlogw
}

/// `n` wavelengths starting at `10^logw0` with log10 step `dlogw`.
pub fn log_uniform(logw0: f64, dlogw: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| 10f64.powf(log_wave(logw0, dlogw, i))).collect()
}

/// Result of placing a log10 wavelength on a log-uniform grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOffset {
    /// Nearest sample index (may be negative when the target precedes the grid).
    pub index: i64,
    /// `target - log_wave(index)`.
    pub residual: f64,
}

impl GridOffset {
    /// Whether the target sits exactly on a sample (within [`LOG_MATCH_ATOL`]).
    pub fn is_exact(&self) -> bool {
        self.residual.abs() <= LOG_MATCH_ATOL
    }
}

/// Closed-form position of `log_target` on the grid starting at `logw0`.
pub fn grid_offset(logw0: f64, dlogw: f64, log_target: f64) -> GridOffset {
    let index = ((log_target - logw0) / dlogw).round() as i64;
    let on_grid = logw0 + (index as f64) * dlogw;
    GridOffset {
        index,
        residual: log_target - on_grid,
    }
}
