use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::prompts;
use crate::models::domain::source_content::{FilePayload, SourceContent};
use crate::models::dto::gemini_dto::{GenerateContentRequest, InlineData, Part};
use crate::models::dto::request::{Difficulty, QuizRequestConfig, QuizType};

static TOPIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^TOPIC:\s*(.+)$").expect("TOPIC_RE is a valid regex pattern")
});
static QUIZ_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^QUIZ TYPE:\s*(.+)$").expect("QUIZ_TYPE_RE is a valid regex pattern")
});
static DIFFICULTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^DIFFICULTY:\s*(.+)$").expect("DIFFICULTY_RE is a valid regex pattern")
});
static CONTENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)CONTENT:\s*(.*)").expect("CONTENT_RE is a valid regex pattern")
});

/// Topic/type/difficulty markers embedded in the text by the upstream form.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StructuredText {
    topic: String,
    quiz_type: QuizType,
    difficulty: Difficulty,
    content: String,
}

/// Translates normalized content plus the request configuration into a model
/// request. Pure string/struct construction; no I/O.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(content: &SourceContent, config: &QuizRequestConfig) -> GenerateContentRequest {
        match content {
            SourceContent::File(payload) => Self::build_file_request(payload, config),
            SourceContent::Text { value } => Self::build_text_request(value, config),
        }
    }

    /// One instruction part plus one inline-data part. The payload travels
    /// untouched except for base64 encoding.
    fn build_file_request(
        payload: &FilePayload,
        config: &QuizRequestConfig,
    ) -> GenerateContentRequest {
        GenerateContentRequest::new(vec![
            Part::Text {
                text: prompts::file_prompt(config.question_count),
            },
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: payload.mime_type.clone(),
                    data: STANDARD.encode(&payload.bytes),
                },
            },
        ])
    }

    fn build_text_request(text: &str, config: &QuizRequestConfig) -> GenerateContentRequest {
        let prompt = if let Some(structured) = Self::parse_structured_text(text) {
            prompts::structured_prompt(
                &structured.topic,
                structured.quiz_type,
                structured.difficulty,
                &structured.content,
                config.question_count,
            )
        } else if let Some(topic) = config.topic.as_deref() {
            // No inline markers, but the form supplied a topic directly.
            prompts::structured_prompt(
                topic,
                config.quiz_type.unwrap_or(QuizType::Comprehensive),
                config.difficulty.unwrap_or(Difficulty::Medium),
                text,
                config.question_count,
            )
        } else {
            prompts::basic_prompt(text, config.question_count)
        };

        GenerateContentRequest::new(vec![Part::Text { text: prompt }])
    }

    /// Structured input needs at least a topic line and a content block;
    /// type and difficulty markers are optional and default like the form.
    fn parse_structured_text(text: &str) -> Option<StructuredText> {
        let topic = TOPIC_RE.captures(text)?.get(1)?.as_str().trim().to_string();
        let content = CONTENT_RE
            .captures(text)?
            .get(1)?
            .as_str()
            .trim()
            .to_string();

        let quiz_type = QUIZ_TYPE_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(QuizType::Comprehensive);
        let difficulty = DIFFICULTY_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(Difficulty::Medium);

        Some(StructuredText {
            topic,
            quiz_type,
            difficulty,
            content,
        })
    }
}
