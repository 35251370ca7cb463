//! Error types for pixel operations.

use thiserror::Error;

/// Error type for colour transforms, window operators and filter-bank parsing.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Kernel geometry rejected before any pixel work.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Malformed filter-bank text.
    #[error("filter bank line {line}: {reason}")]
    Format {
        /// 1-based line number in the source text.
        line: usize,
        reason: String,
    },

    /// Histogram expansion of an image holding a single sample value.
    #[error("cannot expand histogram: every sample equals {value}")]
    DegenerateRange { value: u8 },

    /// Colour operation on an image without R, G and B.
    #[error("expected at least {expected} channels, got {actual}")]
    UnsupportedChannels { expected: usize, actual: usize },

    /// Planes or buffers with incompatible sizes.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Reading a filter-bank file failed.
    #[error("failed to read filter bank: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pixel operations.
pub type FilterResult<T> = Result<T, FilterError>;
