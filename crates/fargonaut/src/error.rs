//! Error types for reading FARGO3D runs.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for fargonaut operations.
pub type Result<T> = std::result::Result<T, FargoError>;

/// Errors raised while opening a run or loading its fields.
#[derive(Error, Debug)]
pub enum FargoError {
    /// A run directory, metadata file or snapshot file does not exist.
    #[error("{what} not found: {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    /// No compile option with this name.
    #[error("option not found: {0}")]
    OptionNotFound(String),

    /// No run variable with this name.
    #[error("variable not found: {0}")]
    VariableNotFound(String),

    /// Field name is not one of the known quantities.
    #[error("unsupported quantity: {0}")]
    UnsupportedQuantity(String),

    /// Snapshot size disagrees with the grid.
    #[error("shape mismatch in {context}: expected {expected} values, found {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Required metadata missing or unparsable.
    #[error("malformed metadata: {0}")]
    MalformedMetadata(String),

    /// The view cannot be drawn for this coordinate system.
    #[error("unsupported view: {0}")]
    UnsupportedView(String),

    /// Caller passed an unusable argument (bad name, index out of range).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reader configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Plot rendering failed.
    #[error("render error: {0}")]
    Render(#[from] renderer::RenderError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FargoError {
    /// Create a NotFound error.
    pub fn not_found(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            what,
            path: path.into(),
        }
    }

    /// Create a MalformedMetadata error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedMetadata(msg.into())
    }

    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// True for missing files and failed option/variable lookups.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::OptionNotFound(_) | Self::VariableNotFound(_)
        )
    }
}
