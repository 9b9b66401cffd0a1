use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Minimum trimmed character count for any text content. Shorter inputs
/// cannot produce a meaningful quiz and are rejected before any work starts.
pub const MIN_TEXT_CHARS: usize = 10;

/// Normalized user-supplied content, captured once at upload/paste time and
/// immutable afterwards. Text is either pasted directly or extracted locally;
/// a file payload ships the original bytes to the remote model untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceContent {
    Text { value: String },
    File(FilePayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub is_image: bool,
}

impl SourceContent {
    pub fn text(value: impl Into<String>) -> Self {
        SourceContent::Text {
            value: value.into(),
        }
    }

    /// Re-checks the construction invariants. Called at the submission entry
    /// point so no network work starts on content that cannot yield a quiz.
    pub fn validate(&self) -> AppResult<()> {
        match self {
            SourceContent::Text { value } => {
                if value.trim().chars().count() < MIN_TEXT_CHARS {
                    return Err(AppError::ValidationError(format!(
                        "Content is too short. Please provide at least {} characters of text.",
                        MIN_TEXT_CHARS
                    )));
                }
                Ok(())
            }
            SourceContent::File(payload) => {
                if payload.bytes.is_empty() {
                    return Err(AppError::ValidationError(
                        "The uploaded file is empty.".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Accepted upload formats, resolved from the file extension. Type is
/// checked before size, and both before any content inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedFormat {
    Txt,
    Pdf,
    Docx,
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl SupportedFormat {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = file_name.rsplit_once('.').map(|(_, ext)| ext)?;
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(SupportedFormat::Txt),
            "pdf" => Some(SupportedFormat::Pdf),
            "docx" => Some(SupportedFormat::Docx),
            "png" => Some(SupportedFormat::Png),
            "jpg" | "jpeg" => Some(SupportedFormat::Jpeg),
            "gif" => Some(SupportedFormat::Gif),
            "webp" => Some(SupportedFormat::Webp),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            SupportedFormat::Txt => "text/plain",
            SupportedFormat::Pdf => "application/pdf",
            SupportedFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            SupportedFormat::Png => "image/png",
            SupportedFormat::Jpeg => "image/jpeg",
            SupportedFormat::Gif => "image/gif",
            SupportedFormat::Webp => "image/webp",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(
            self,
            SupportedFormat::Png
                | SupportedFormat::Jpeg
                | SupportedFormat::Gif
                | SupportedFormat::Webp
        )
    }
}
