// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the pose-ensemble library.

use std::fmt;

/// Result type alias for ensemble operations.
pub type Result<T> = std::result::Result<T, EnsembleError>;

/// Main error type for the pose-ensemble library.
#[derive(Debug)]
pub enum EnsembleError {
    /// Error loading the ONNX model.
    ModelLoadError(String),
    /// Error during model inference.
    InferenceError(String),
    /// Error reading or decoding images.
    ImageError(String),
    /// Invalid configuration provided.
    ConfigError(String),
    /// Wrapped `std::io::Error`
    Io(std::io::Error),
}

impl fmt::Display for EnsembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelLoadError(msg) => write!(f, "Model load error: {msg}"),
            Self::InferenceError(msg) => write!(f, "Inference error: {msg}"),
            Self::ImageError(msg) => write!(f, "Image error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for EnsembleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EnsembleError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for EnsembleError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageError(err.to_string())
    }
}
