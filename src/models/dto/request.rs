use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// User-selected generation parameters, immutable per request. Validated at
/// the submission entry point before any extraction or network work begins.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct QuizRequestConfig {
    #[validate(range(min = 5, max = 100, message = "question count must be between 5 and 100"))]
    pub question_count: u16,

    #[validate(length(min = 1, max = 200))]
    pub topic: Option<String>,

    pub quiz_type: Option<QuizType>,

    pub difficulty: Option<Difficulty>,
}

impl QuizRequestConfig {
    pub fn with_count(question_count: u16) -> Self {
        Self {
            question_count,
            topic: None,
            quiz_type: None,
            difficulty: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizType {
    Comprehensive,
    Conceptual,
    Detailed,
    Application,
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuizType::Comprehensive => "comprehensive",
            QuizType::Conceptual => "conceptual",
            QuizType::Detailed => "detailed",
            QuizType::Application => "application",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for QuizType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comprehensive" => Ok(QuizType::Comprehensive),
            "conceptual" => Ok(QuizType::Conceptual),
            "detailed" => Ok(QuizType::Detailed),
            "application" => Ok(QuizType::Application),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Difficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(()),
        }
    }
}
