//! Error types for the mockup generator

use thiserror::Error;

/// Result type alias for mockup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while composing or capturing a mockup
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or decode an avatar image
    #[error("Avatar load failed: {0}")]
    AvatarError(String),

    /// Failed to render the mockup surface
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to serialize the rendered surface to a bitmap
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// I/O error while saving output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::CaptureError(err.to_string())
    }
}
