//! FaunaLens Core
//!
//! Types, validation, and rendering shared by the FaunaLens server and client.
//!
//! This crate provides:
//! - The `ClassificationResult` data model and its taxonomy
//! - Structural validation of model output against that model
//! - The provider-facing structured-output schema and instruction prompt
//! - Data URI handling for image payloads
//! - A plain-text report renderer for classification results

pub mod error;
pub mod image;
pub mod prompt;
pub mod report;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use image::{ImageFormat, ImagePayload};
pub use schema::{response_schema, validate, validate_str, ValidationError};
pub use types::{ClassificationResult, Taxonomy};

