//! Wire types for the Gemini `generateContent` endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub fn new(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded file bytes.
    pub data: String,
}

/// Fixed sampling parameters for quiz generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// First candidate's first text part. An absent completion becomes
    /// `"{}"`, which the response parser treats as an empty quiz.
    pub fn completion_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.clone())
            .unwrap_or_else(|| "{}".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_generation_config() {
        let request = GenerateContentRequest::new(vec![Part::Text {
            text: "prompt".to_string(),
        }]);

        let json = serde_json::to_value(&request).expect("request should serialize");
        let config = &json["generationConfig"];

        assert_eq!(config["temperature"], 0.7);
        assert_eq!(config["topK"], 40);
        assert_eq!(config["topP"], 0.95);
        assert_eq!(config["maxOutputTokens"], 8192);
        assert_eq!(json["contents"][0]["parts"][0]["text"], "prompt");
    }

    #[test]
    fn inline_data_part_keeps_snake_case_fields() {
        let part = Part::InlineData {
            inline_data: InlineData {
                mime_type: "application/pdf".to_string(),
                data: "QUJD".to_string(),
            },
        };

        let json = serde_json::to_value(&part).expect("part should serialize");
        assert_eq!(json["inline_data"]["mime_type"], "application/pdf");
        assert_eq!(json["inline_data"]["data"], "QUJD");
    }

    #[test]
    fn completion_text_defaults_to_empty_object() {
        let response: GenerateContentResponse =
            serde_json::from_str("{\"candidates\":[]}").expect("response should deserialize");
        assert_eq!(response.completion_text(), "{}");

        let response: GenerateContentResponse = serde_json::from_str(
            "{\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"hello\"}]}}]}",
        )
        .expect("response should deserialize");
        assert_eq!(response.completion_text(), "hello");
    }
}
