//! Error types for plot rendering.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while rasterising or encoding a plot.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Image or mesh dimensions do not match the supplied buffers
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Nothing finite to draw
    #[error("No finite data to render")]
    EmptyData,

    /// PNG encoding failed
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
