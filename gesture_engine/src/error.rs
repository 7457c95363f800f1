//! Error type shared by the engine modules.

/// Result type alias for the gesture engine.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the gesture engine.
///
/// None of these arise from landmark input: missing hands, ambiguous frames
/// and near-camera depths are absorbed where they occur.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Frame size mismatch: expected {expected} pixels, got {actual}")]
    FrameSize { expected: usize, actual: usize },

    #[error("Invalid brush: {0}")]
    InvalidBrush(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
