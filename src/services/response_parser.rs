use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz::{Quiz, QuizQuestion};

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```(?:json)?").expect("CODE_FENCE_RE is a valid regex pattern")
});

const FALLBACK_TOPICS: [&str; 5] = [
    "Artificial Intelligence",
    "Machine Learning",
    "Web Development",
    "Data Science",
    "Computer Programming",
];

const DEFAULT_OPTIONS: [&str; 4] = ["A) Option A", "B) Option B", "C) Option C", "D) Option D"];

/// Lenient mirror of the mandated response shape: every field optional so a
/// structurally incomplete record survives deserialization and gets
/// repaired instead of rejected.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    quiz: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: Option<String>,
    options: Option<Vec<String>>,
    answer: Option<String>,
}

/// Turns the model's free-form reply into a validated `Quiz`. Parsing never
/// fails outward: a reply that cannot be coerced degrades to a synthetic
/// fallback quiz so the caller always receives something playable.
pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(raw: &str, question_count: u16) -> Quiz {
        match Self::try_parse(raw) {
            Ok(mut questions) => {
                questions.truncate(question_count as usize);
                Quiz::new(questions, false)
            }
            Err(err) => {
                log::error!("Failed to parse model response: {}", err);
                log::error!("Raw response was: {}", raw);
                Quiz::new(Self::fallback_questions(question_count), true)
            }
        }
    }

    /// The fallible half of parsing, kept separate so the failure is a
    /// first-class `ParseError` before it is absorbed into the fallback.
    fn try_parse(raw: &str) -> AppResult<Vec<QuizQuestion>> {
        let cleaned = CODE_FENCE_RE.replace_all(raw, "");
        let json = Self::extract_json_object(cleaned.trim()).ok_or_else(|| {
            AppError::ParseError("response contains no JSON object".to_string())
        })?;

        let envelope: RawEnvelope = serde_json::from_str(json)?;

        Ok(envelope
            .quiz
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Self::repair_question(index, raw))
            .collect())
    }

    /// Locates the first balanced `{...}` span by tracking brace depth,
    /// skipping braces inside string literals and escape sequences. More
    /// robust than a greedy first-to-last-brace match when the model emits
    /// commentary after the object.
    fn extract_json_object(text: &str) -> Option<&str> {
        let start = text.find('{')?;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (offset, ch) in text[start..].char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' if in_string => escaped = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[start..start + offset + ch.len_utf8()]);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Backfills any missing field with a placeholder so the consumer never
    /// receives a structurally incomplete record, and normalizes the answer
    /// to a single letter matching one option's label.
    fn repair_question(index: usize, raw: RawQuestion) -> QuizQuestion {
        let question = raw
            .question
            .filter(|q| !q.trim().is_empty())
            .unwrap_or_else(|| format!("Question {} about the content", index + 1));

        let options = match raw.options {
            Some(options) if !options.is_empty() => options,
            _ => DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect(),
        };

        let answer = Self::normalize_answer(raw.answer.as_deref(), &options);

        QuizQuestion {
            question,
            options,
            answer,
            note: None,
        }
    }

    /// Answer repair: first alphabetic character, uppercased, and only if it
    /// matches the leading letter of some option; otherwise the first
    /// option's letter, with "A" as the last resort.
    fn normalize_answer(answer: Option<&str>, options: &[String]) -> String {
        let first_option_letter = options
            .first()
            .and_then(|option| QuizQuestion::option_letter(option));

        let candidate = answer
            .and_then(|a| a.chars().find(char::is_ascii_alphabetic))
            .map(|c| c.to_ascii_uppercase());

        match candidate {
            Some(letter)
                if options
                    .iter()
                    .any(|option| QuizQuestion::option_letter(option) == Some(letter)) =>
            {
                letter.to_string()
            }
            _ => first_option_letter.unwrap_or('A').to_string(),
        }
    }

    /// Deterministic in shape, random only in topic. Each question carries a
    /// note so the UI (and logs) can tell these are placeholders.
    fn fallback_questions(question_count: u16) -> Vec<QuizQuestion> {
        let topic = FALLBACK_TOPICS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(FALLBACK_TOPICS[0]);

        (1..=question_count)
            .map(|n| QuizQuestion {
                question: format!("Question {}: What is a key aspect of {}?", n, topic),
                options: vec![
                    "A) Understanding algorithms".to_string(),
                    "B) Data analysis techniques".to_string(),
                    "C) Problem-solving methods".to_string(),
                    "D) All of the above".to_string(),
                ],
                answer: "D".to_string(),
                note: Some(
                    "This is a fallback question. Please check your API configuration."
                        .to_string(),
                ),
            })
            .collect()
    }
}
