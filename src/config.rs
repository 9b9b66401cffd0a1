use secrecy::SecretString;
use std::env;

use crate::errors::{AppError, AppResult};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Byte ceilings differ by format class: documents get tens of MB,
/// images single-digit MB.
pub const DEFAULT_DOCUMENT_MAX_BYTES: u64 = 25 * 1024 * 1024;
pub const DEFAULT_IMAGE_MAX_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub document_max_bytes: u64,
    pub image_max_bytes: u64,
}

impl Config {
    /// Builds the configuration from the process environment. Fails fast
    /// with a `ConfigurationError` when the credential is absent so the
    /// caller is never told to "check your connection" for a missing key.
    pub fn from_env() -> AppResult<Self> {
        let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(AppError::ConfigurationError(
                "GEMINI_API_KEY is not set. Please check your environment settings.".to_string(),
            ));
        }

        if !api_key.starts_with("AIza") {
            log::warn!("GEMINI_API_KEY does not look like a Google API key");
        }

        Ok(Self {
            api_key: SecretString::from(api_key),
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            document_max_bytes: env::var("DOCUMENT_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DOCUMENT_MAX_BYTES),
            image_max_bytes: env::var("IMAGE_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_IMAGE_MAX_BYTES),
        })
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_key: SecretString::from("AIzaTestKeyNotReal".to_string()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 5,
            document_max_bytes: DEFAULT_DOCUMENT_MAX_BYTES,
            image_max_bytes: DEFAULT_IMAGE_MAX_BYTES,
        }
    }
}
