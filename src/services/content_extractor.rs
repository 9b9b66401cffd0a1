use crate::config::{Config, DEFAULT_DOCUMENT_MAX_BYTES, DEFAULT_IMAGE_MAX_BYTES};
use crate::errors::{AppError, AppResult};
use crate::models::domain::source_content::{
    FilePayload, SourceContent, SupportedFormat, MIN_TEXT_CHARS,
};

/// Normalizes one uploaded file or pasted string into `SourceContent`,
/// deciding per format whether to extract text locally or defer extraction
/// to the remote model by shipping the raw bytes.
///
/// Deterministic given identical bytes; no I/O beyond the input slice.
#[derive(Clone)]
pub struct ContentExtractor {
    document_max_bytes: u64,
    image_max_bytes: u64,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self {
            document_max_bytes: DEFAULT_DOCUMENT_MAX_BYTES,
            image_max_bytes: DEFAULT_IMAGE_MAX_BYTES,
        }
    }
}

impl ContentExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            document_max_bytes: config.document_max_bytes,
            image_max_bytes: config.image_max_bytes,
        }
    }

    #[cfg(test)]
    pub fn with_limits(document_max_bytes: u64, image_max_bytes: u64) -> Self {
        Self {
            document_max_bytes,
            image_max_bytes,
        }
    }

    pub fn from_pasted_text(&self, text: &str) -> AppResult<SourceContent> {
        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_TEXT_CHARS {
            return Err(AppError::ValidationError(format!(
                "Content is too short. Please provide at least {} characters of text.",
                MIN_TEXT_CHARS
            )));
        }
        Ok(SourceContent::text(trimmed))
    }

    /// Type and size are checked before any content inspection, in that
    /// order, so oversized or disallowed uploads fail without parsing work.
    pub fn from_file(&self, file_name: &str, bytes: Vec<u8>) -> AppResult<SourceContent> {
        let format = SupportedFormat::from_file_name(file_name).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Unsupported file type: {}. Please upload a TXT, PDF, DOCX, or image file.",
                file_name
            ))
        })?;

        let ceiling = if format.is_image() {
            self.image_max_bytes
        } else {
            self.document_max_bytes
        };
        if bytes.len() as u64 > ceiling {
            return Err(AppError::ValidationError(format!(
                "File is too large. The limit for this file type is {} MB.",
                ceiling / (1024 * 1024)
            )));
        }

        match format {
            SupportedFormat::Txt => {
                let text = String::from_utf8_lossy(&bytes);
                self.from_pasted_text(&text)
            }
            SupportedFormat::Docx => self.extract_docx(&bytes),
            SupportedFormat::Pdf => Ok(self.extract_pdf_or_fallback(file_name, bytes, format)),
            _ => Ok(Self::file_payload(file_name, bytes, format)),
        }
    }

    /// Walks paragraph runs of the document XML. An empty result is an
    /// extraction failure, not a fallback: DOCX has no remote second tier.
    fn extract_docx(&self, bytes: &[u8]) -> AppResult<SourceContent> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| AppError::ExtractionError(format!("Failed to parse DOCX file: {}", e)))?;

        let mut text = String::new();
        for child in docx.document.children {
            if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
                for paragraph_child in paragraph.children {
                    if let docx_rs::ParagraphChild::Run(run) = paragraph_child {
                        for run_child in run.children {
                            if let docx_rs::RunChild::Text(t) = run_child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
                text.push('\n');
            }
        }

        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_TEXT_CHARS {
            return Err(AppError::ExtractionError(
                "The document appears to be empty or unsupported.".to_string(),
            ));
        }
        Ok(SourceContent::text(trimmed))
    }

    /// Two-tier policy: prefer the local text layer (cheaper, more
    /// controllable); a scanned or image-based PDF degrades to a raw payload
    /// so the remote model can do its own document understanding.
    fn extract_pdf_or_fallback(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        format: SupportedFormat,
    ) -> SourceContent {
        match pdf_extract::extract_text_from_mem(&bytes) {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.chars().count() >= MIN_TEXT_CHARS {
                    SourceContent::text(trimmed)
                } else {
                    log::info!(
                        "PDF text layer too sparse ({} chars), shipping raw bytes for {}",
                        trimmed.chars().count(),
                        file_name
                    );
                    Self::file_payload(file_name, bytes, format)
                }
            }
            Err(e) => {
                log::info!(
                    "PDF text extraction failed ({}), shipping raw bytes for {}",
                    e,
                    file_name
                );
                Self::file_payload(file_name, bytes, format)
            }
        }
    }

    fn file_payload(file_name: &str, bytes: Vec<u8>, format: SupportedFormat) -> SourceContent {
        let size_bytes = bytes.len() as u64;
        SourceContent::File(FilePayload {
            bytes,
            mime_type: format.mime_type().to_string(),
            file_name: file_name.to_string(),
            size_bytes,
            is_image: format.is_image(),
        })
    }
}
