//! Error types for FaunaLens

use std::time::Duration;

use crate::schema::ValidationError;

/// Result type alias using FaunaLens's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for classification operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request carried no usable `image` field
    #[error("no image provided")]
    MissingInput,

    /// The image payload could not be decoded
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The inference provider call failed (network, auth, quota, refusal)
    #[error("inference failed: {0}")]
    Inference(String),

    /// Model output did not match the classification schema
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The inference call did not finish in time
    #[error("inference timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new invalid image error
    pub fn invalid_image(msg: impl Into<String>) -> Self {
        Self::InvalidImage(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingInput => "missing_input",
            Self::InvalidImage(_) => "invalid_image",
            Self::Inference(_) => "inference",
            Self::Validation(_) => "validation",
            Self::Timeout(_) => "timeout",
            Self::Config(_) => "config",
        }
    }

    /// Whether the caller can fix this by changing the request
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingInput)
    }
}
