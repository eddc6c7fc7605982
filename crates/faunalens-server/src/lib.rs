//! FaunaLens Server
//!
//! HTTP endpoint that forwards an uploaded photo to a multimodal model and
//! returns a validated animal classification, plus a small upload client.

pub mod cli;
pub mod client;
pub mod config;
pub mod provider;
pub mod routes;
pub mod service;

pub use config::{ProviderConfig, ServerConfig};
pub use provider::{GeminiProvider, InferenceProvider, InferenceRequest};
pub use routes::create_router;
pub use service::{classify, AppState};
