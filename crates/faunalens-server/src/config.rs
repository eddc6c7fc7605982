//! Server configuration

use std::path::Path;
use std::time::Duration;

use faunalens_core::Error;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::cli::ServeArgs;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Inference provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Upper bound on a single inference call
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Request body limit; a base64 data URI is about 4/3 of the image size
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Browser origins allowed to call the API (empty allows any)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Inference provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the generative language API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// API key, only ever taken from the CLI or environment
    #[serde(skip)]
    pub api_key: Option<SecretString>,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &ServeArgs) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            info!("Reading configuration from {}", config_path);
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        config.apply_overrides(cli);
        config.validate()?;

        Ok(config)
    }

    fn apply_overrides(&mut self, cli: &ServeArgs) {
        if let Some(listen) = &cli.listen {
            self.listen = listen.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(base_url) = &cli.base_url {
            self.provider.base_url = base_url.clone();
        }
        if let Some(model) = &cli.model {
            self.provider.model = model.clone();
        }
        if let Some(key) = &cli.api_key {
            self.provider.api_key = Some(SecretString::from(key.clone()));
        }
        if let Some(timeout) = cli.timeout_secs {
            self.request_timeout_secs = timeout;
        }
    }

    /// Check the settings the server cannot run without
    pub fn validate(&self) -> Result<(), Error> {
        let url = Url::parse(&self.provider.base_url)
            .map_err(|e| Error::config(format!("invalid provider base_url: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "provider base_url scheme '{}' is not http(s)",
                url.scheme()
            )));
        }
        if self.provider.model.trim().is_empty() {
            return Err(Error::config("provider model must not be empty"));
        }
        if self.provider.api_key.is_none() {
            return Err(Error::config(
                "missing API key, set GOOGLE_GENERATIVE_AI_API_KEY or pass --api-key",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::config("request_timeout_secs must be greater than zero"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            provider: ProviderConfig::default(),
            request_timeout_secs: default_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_body_bytes() -> usize {
    16 * 1024 * 1024
}
