//! Prompt templates for quiz generation. Every variant mandates the same
//! JSON-only response shape so the response parser has a single contract.

use crate::models::dto::request::{Difficulty, QuizType};

pub const RESPONSE_FORMAT_BLOCK: &str = r#"{
  "quiz": [
    {
      "question": "Question text",
      "options": ["A) ...", "B) ...", "C) ...", "D) ..."],
      "answer": "A"
    }
  ]
}"#;

/// Minimal prompt for plain text with no structured markers.
pub fn basic_prompt(text: &str, question_count: u16) -> String {
    format!(
        "Create {count} multiple-choice questions based on the following text. \
The questions should test comprehension of key concepts, facts, and details.\n\n\
TEXT:\n{text}\n\n\
Generate {count} questions with 4 options each. Format as JSON:\n{format}",
        count = question_count,
        text = text,
        format = RESPONSE_FORMAT_BLOCK,
    )
}

/// Richer prompt for content that carries an explicit topic, quiz type, and
/// difficulty. Instructs the model to rely only on the supplied content.
pub fn structured_prompt(
    topic: &str,
    quiz_type: QuizType,
    difficulty: Difficulty,
    content: &str,
    question_count: u16,
) -> String {
    format!(
        "Create a {count}-question multiple-choice quiz about \"{topic}\".\n\n\
QUIZ SPECIFICATIONS:\n\
- Type: {quiz_type} quiz\n\
- Difficulty: {difficulty} level\n\
- Questions should test understanding of the specific content provided\n\
- Focus on key concepts, facts, and applications mentioned\n\
- Make questions challenging but fair\n\n\
CONTENT TO BASE QUESTIONS ON:\n{content}\n\n\
QUESTION REQUIREMENTS:\n\
- {count} questions total\n\
- 4 options per question (A, B, C, D)\n\
- Only one correct answer per question\n\
- Options should be plausible but distinct\n\
- Questions should cover different aspects of the content\n\
- Include conceptual, factual, and application questions\n\n\
RESPONSE FORMAT (JSON only):\n{format}\n\n\
Ensure questions are directly based on the provided content and appropriate for {difficulty} difficulty.",
        count = question_count,
        topic = topic,
        quiz_type = quiz_type,
        difficulty = difficulty,
        content = content,
        format = RESPONSE_FORMAT_BLOCK,
    )
}

/// Instruction block paired with an inline file payload. The document itself
/// travels as a separate request part; the model does its own understanding.
pub fn file_prompt(question_count: u16) -> String {
    format!(
        "Analyze this document and create {count} multiple-choice questions that test \
understanding of the key content.\n\n\
Generate questions that cover:\n\
- Main concepts and ideas\n\
- Important facts and details\n\
- Practical applications\n\
- Relationships between concepts\n\n\
Create {count} questions with 4 options each. Format as JSON:\n{format}",
        count = question_count,
        format = RESPONSE_FORMAT_BLOCK,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_prompt_embeds_text_and_count() {
        let prompt = basic_prompt("The capital of France is Paris.", 1);

        assert!(prompt.contains("The capital of France is Paris."));
        assert!(prompt.contains("Create 1 multiple-choice questions"));
        assert!(prompt.contains(RESPONSE_FORMAT_BLOCK));
    }

    #[test]
    fn structured_prompt_states_topic_type_and_difficulty() {
        let prompt = structured_prompt(
            "Photosynthesis",
            QuizType::Conceptual,
            Difficulty::Hard,
            "Plants convert light into energy.",
            12,
        );

        assert!(prompt.contains("quiz about \"Photosynthesis\""));
        assert!(prompt.contains("Type: conceptual quiz"));
        assert!(prompt.contains("Difficulty: hard level"));
        assert!(prompt.contains("Plants convert light into energy."));
        assert!(prompt.contains("12 questions total"));
    }

    #[test]
    fn file_prompt_lists_coverage_goals() {
        let prompt = file_prompt(8);

        assert!(prompt.contains("create 8 multiple-choice questions"));
        assert!(prompt.contains("Main concepts and ideas"));
        assert!(prompt.contains("Relationships between concepts"));
    }
}
