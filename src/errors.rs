use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Remote request error: {0}")]
    RemoteRequestError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Busy: {0}")]
    Busy(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::ExtractionError(_) => "EXTRACTION_ERROR",
            AppError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            AppError::RemoteRequestError(_) => "REMOTE_REQUEST_ERROR",
            AppError::ParseError(_) => "PARSE_ERROR",
            AppError::Busy(_) => "BUSY",
        }
    }

    /// Whether the user can recover by retrying with different input.
    /// Configuration failures need the environment fixed first.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::ConfigurationError(_))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
