use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single four-option multiple-choice question. Options carry their letter
/// label inline ("A) ..."); `answer` is the single letter of the correct
/// option. Both invariants are enforced by the response parser's repair
/// pass, so consumers can rely on them without re-checking.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl QuizQuestion {
    /// Leading letter label of an option string, e.g. "B) Paris" -> 'B'.
    pub fn option_letter(option: &str) -> Option<char> {
        option
            .trim_start()
            .chars()
            .next()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
    }

    /// Answer identity is compared by label letter, not by full option
    /// text, so prompt-template wording changes ("A) ..." vs "A. ...")
    /// cannot break scoring.
    pub fn is_correct(&self, selected_option: &str) -> bool {
        match (Self::option_letter(selected_option), self.answer.chars().next()) {
            (Some(selected), Some(answer)) => selected == answer.to_ascii_uppercase(),
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub questions: Vec<QuizQuestion>,
    /// Set when the model's reply could not be parsed and the questions are
    /// synthetic placeholders. Downstream code must treat such a quiz as
    /// low-confidence.
    pub fallback: bool,
    pub generated_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(questions: Vec<QuizQuestion>, fallback: bool) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            questions,
            fallback,
            generated_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Counts correct picks; a `None` entry is an unanswered question.
    pub fn score(&self, selections: &[Option<String>]) -> usize {
        self.questions
            .iter()
            .zip(selections)
            .filter(|(question, selection)| {
                selection
                    .as_deref()
                    .is_some_and(|chosen| question.is_correct(chosen))
            })
            .count()
    }
}
