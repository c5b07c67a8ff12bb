//! Error types for scintiloc.

use thiserror::Error;

/// Result alias for scintiloc operations.
pub type ScintilocResult<T> = std::result::Result<T, ScintilocError>;

/// Errors that can occur when building calibrations or decoding data files.
#[derive(Debug, Error)]
pub enum ScintilocError {
    /// A grid was declared with a zero-sized axis.
    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A data buffer does not match its declared shape.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A basis order outside the supported range was requested.
    #[error("unsupported spline order {order} (supported: 2..={max})")]
    UnsupportedOrder { order: usize, max: usize },
    /// The sample count does not match what an exact interpolation requires.
    #[error("bad sample count on {axis} axis: expected {expected}, got {got}")]
    SampleCountMismatch {
        axis: &'static str,
        expected: usize,
        got: usize,
    },
    /// Fewer samples than basis functions in a least-squares fit.
    #[error("too few samples on {axis} axis: need at least {needed}, got {got}")]
    TooFewSamples {
        axis: &'static str,
        needed: usize,
        got: usize,
    },
    /// A fit sample site lies outside the unit domain.
    #[error("sample site {value} on {axis} axis is outside [0, 1]")]
    SampleOutOfDomain { axis: &'static str, value: f64 },
    /// A collocation or normal matrix turned out singular, indicating a
    /// degenerate sample layout.
    #[error("singular {size}x{size} matrix in spline fit")]
    SingularMatrix { size: usize },
    /// Calibration parts disagree on channel count or grid shape.
    #[error("calibration shape mismatch: {0}")]
    CalibrationShape(&'static str),
    /// An underlying I/O operation failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// A data file does not match its expected framing.
    #[error("malformed file: {0}")]
    MalformedFile(&'static str),
}
