//! Upload client for a running FaunaLens server
//!
//! Applies the same checks as the browser uploader before sending: the file
//! must be an image and at most 10MB.

use std::path::Path;

use faunalens_core::image::ImageFormat;
use faunalens_core::{ClassificationResult, ImagePayload};
use serde::Deserialize;
use tracing::debug;

/// Largest file the client will upload
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Message shown to the user when classification fails
pub const CLIENT_ERROR_MESSAGE: &str =
    "Terjadi kesalahan saat mengklasifikasi gambar. Silakan coba lagi.";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("File bukan gambar ({0})")]
    NotAnImage(String),

    #[error("Ukuran file maksimal 10MB ({0} bytes)")]
    TooLarge(u64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error(transparent)]
    Payload(#[from] faunalens_core::Error),
}

impl UploadError {
    /// Whether the problem was caught before anything was sent
    pub fn is_local(&self) -> bool {
        matches!(self, Self::NotAnImage(_) | Self::TooLarge(_) | Self::Io(_))
    }

    /// Text to show the user. Anything past the local checks gets the
    /// generic message.
    pub fn user_message(&self) -> String {
        if self.is_local() {
            self.to_string()
        } else {
            CLIENT_ERROR_MESSAGE.to_string()
        }
    }
}

/// Read and check an image file, ready for upload
pub async fn load_image(path: &Path) -> Result<ImagePayload, UploadError> {
    let size = tokio::fs::metadata(path).await?.len();
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge(size));
    }

    let guessed = mime_guess::from_path(path).first_raw();
    let bytes = tokio::fs::read(path).await?;

    let mime_type = match guessed {
        Some(mime) if mime.starts_with("image/") => mime.to_string(),
        other => match ImageFormat::detect(&bytes) {
            Some(format) => format.mime_type().to_string(),
            None => {
                return Err(UploadError::NotAnImage(
                    other.unwrap_or("unknown type").to_string(),
                ))
            }
        },
    };

    debug!("Loaded {} ({}, {} bytes)", path.display(), mime_type, bytes.len());
    Ok(ImagePayload::from_bytes(&bytes, mime_type)?)
}

#[derive(Debug, Deserialize)]
struct SuccessBody {
    result: ClassificationResult,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for `POST /api/classify`
#[derive(Debug, Clone)]
pub struct ClassifyClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ClassifyClient {
    pub fn new(server: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/classify", server.trim_end_matches('/')),
        }
    }

    /// Load, check and submit one image file
    pub async fn classify_path(&self, path: &Path) -> Result<ClassificationResult, UploadError> {
        let image = load_image(path).await?;
        self.classify(&image).await
    }

    /// Submit one image and return the validated result
    pub async fn classify(&self, image: &ImagePayload) -> Result<ClassificationResult, UploadError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "image": image.to_data_uri() }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: SuccessBody = response.json().await?;
            return Ok(body.result);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };
        Err(UploadError::Server {
            status: status.as_u16(),
            message,
        })
    }
}
