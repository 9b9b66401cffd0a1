pub mod fixtures {
    use crate::models::dto::request::QuizRequestConfig;

    /// Canned model reply used by the end-to-end scenario tests.
    pub const FRANCE_REPLY: &str = r#"{"quiz":[{"question":"What is the capital of France?","options":["A) London","B) Paris","C) Berlin","D) Madrid"],"answer":"B"}]}"#;

    pub fn test_request_config(question_count: u16) -> QuizRequestConfig {
        QuizRequestConfig::with_count(question_count)
    }

    /// The same reply as the model tends to produce it: fenced, with chatter
    /// around the object.
    pub fn fenced_reply() -> String {
        format!("Here is your quiz:\n```json\n{}\n```", FRANCE_REPLY)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixture_reply_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(FRANCE_REPLY).unwrap();
        assert_eq!(value["quiz"][0]["answer"], "B");
    }

    #[test]
    fn test_fixture_config_count() {
        assert_eq!(test_request_config(5).question_count, 5);
    }
}
