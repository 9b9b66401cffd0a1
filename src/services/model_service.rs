use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::dto::gemini_dto::{
    ApiErrorResponse, GenerateContentRequest, GenerateContentResponse,
};

/// Network seam for quiz generation. The orchestration layer only ever sees
/// this trait, so tests can substitute a mock and assert call counts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Sends one request and returns the raw textual completion. A single
    /// attempt: either it succeeds or the error propagates for display.
    async fn generate(&self, request: GenerateContentRequest) -> AppResult<String>;
}

/// HTTPS client for the Gemini `generateContent` endpoint.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: Config,
}

impl GeminiClient {
    /// The credential is validated here, at construction, so a missing key
    /// surfaces as a configuration error before any network call exists.
    pub fn new(config: Config) -> AppResult<Self> {
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ConfigurationError(
                "API key is not configured. Please check your environment settings.".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { http, config })
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            self.config.api_key.expose_secret(),
        )
    }

    /// Maps a non-success response to a distinct, user-presentable error
    /// kind rather than re-throwing the raw payload.
    fn map_api_error(status: StatusCode, body: &str) -> AppError {
        let message = serde_json::from_str::<ApiErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());

        if status == StatusCode::BAD_REQUEST {
            if message.contains("API_KEY_INVALID") {
                return AppError::ConfigurationError(
                    "Invalid API key. Please check your Gemini API key configuration.".to_string(),
                );
            }
            return AppError::RemoteRequestError(
                "Invalid request to the generation service. Please try with different content."
                    .to_string(),
            );
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return AppError::RemoteRequestError(
                "API rate limit exceeded. Please wait a moment and try again.".to_string(),
            );
        }

        if message.contains("file") || message.contains("document") {
            return AppError::RemoteRequestError(
                "The AI service couldn't process the document. Please try a text file or paste the content directly."
                    .to_string(),
            );
        }

        AppError::RemoteRequestError(format!(
            "Generation service error ({}): {}",
            status.as_u16(),
            message
        ))
    }

    fn map_transport_error(err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::RemoteRequestError(
                "The generation service did not respond in time. Please try again.".to_string(),
            )
        } else if err.is_connect() {
            AppError::RemoteRequestError(
                "Network error. Please check your internet connection and try again.".to_string(),
            )
        } else {
            AppError::RemoteRequestError(format!("Request failed: {}", err))
        }
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate(&self, request: GenerateContentRequest) -> AppResult<String> {
        log::info!("Sending generation request to model {}", self.config.model);

        let response = self
            .http
            .post(self.endpoint_url())
            .json(&request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = Self::map_api_error(status, &body);
            log::warn!("Generation request failed: {} ({})", err, status);
            return Err(err);
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            AppError::RemoteRequestError(format!("Failed to read generation response: {}", e))
        })?;

        Ok(parsed.completion_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn missing_key_is_a_configuration_error() {
        let mut config = Config::test_config();
        config.api_key = SecretString::from("   ".to_string());

        let err = GeminiClient::new(config).unwrap_err();
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }

    #[test]
    fn endpoint_url_embeds_model_and_key() {
        let client = GeminiClient::new(Config::test_config()).unwrap();
        let url = client.endpoint_url();

        assert!(url.starts_with(
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key="
        ));
        assert!(url.ends_with("AIzaTestKeyNotReal"));
    }

    #[test]
    fn bad_request_with_invalid_key_maps_to_configuration_error() {
        let body = r#"{"error":{"message":"API key not valid. API_KEY_INVALID"}}"#;
        let err = GeminiClient::map_api_error(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, AppError::ConfigurationError(_)));
    }

    #[test]
    fn other_bad_requests_map_to_remote_request_error() {
        let body = r#"{"error":{"message":"Unable to submit request"}}"#;
        let err = GeminiClient::map_api_error(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, AppError::RemoteRequestError(_)));
        assert!(err.to_string().contains("different content"));
    }

    #[test]
    fn rate_limit_has_its_own_message() {
        let err = GeminiClient::map_api_error(StatusCode::TOO_MANY_REQUESTS, "{}");
        assert!(err.to_string().contains("rate limit"));
    }

    #[test]
    fn refused_document_is_detected_by_error_substrings() {
        let body = r#"{"error":{"message":"Unable to process input document"}}"#;
        let err = GeminiClient::map_api_error(StatusCode::INTERNAL_SERVER_ERROR, body);
        assert!(err.to_string().contains("couldn't process the document"));
    }

    #[test]
    fn unrecognized_errors_keep_the_status_code() {
        let err = GeminiClient::map_api_error(StatusCode::SERVICE_UNAVAILABLE, "overloaded");
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("overloaded"));
    }
}
