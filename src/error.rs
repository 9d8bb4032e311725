//! Error handling for the motion pipeline

/// Result type alias
pub type Result<T> = std::result::Result<T, MotionError>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    /// Invalid parameter supplied at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operation was called before the state it needs was initialized
    #[error("Uninitialized state: {0}")]
    UninitializedState(&'static str),

    /// Frame resolution disagrees with the background model
    #[error(
        "Dimension mismatch: expected {}x{}, got {}x{}",
        .expected.0, .expected.1, .actual.0, .actual.1
    )]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MotionError {
    /// Whether the stream can continue after this error.
    ///
    /// Only a dimension mismatch self-heals (the background model is rebuilt
    /// from the offending frame); everything else stops the stream.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MotionError::DimensionMismatch { .. })
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        MotionError::Configuration(msg.into())
    }
}
