use std::env;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use quizsmith::config::Config;
use quizsmith::errors::{AppError, AppResult};
use quizsmith::models::domain::Quiz;
use quizsmith::models::dto::request::QuizRequestConfig;
use quizsmith::services::quiz_service::QuizService;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    match run().await {
        Ok(quiz) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&quiz).expect("quiz serializes to JSON")
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error [{}]: {}", err.error_code(), err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<Quiz> {
    let args: Vec<String> = env::args().collect();
    let input = args.get(1).map(String::as_str).ok_or_else(|| {
        AppError::ValidationError(
            "usage: quizsmith <file|-> [question_count]  (use '-' to read pasted text from stdin)"
                .to_string(),
        )
    })?;
    let question_count: u16 = args
        .get(2)
        .map(|v| {
            v.parse().map_err(|_| {
                AppError::ValidationError(format!("invalid question count: {}", v))
            })
        })
        .transpose()?
        .unwrap_or(10);

    let config = Config::from_env()?;
    let service = QuizService::new(config)?;
    let request = QuizRequestConfig::with_count(question_count);

    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| AppError::ValidationError(format!("failed to read stdin: {}", e)))?;
        return service.generate_from_text(&text, request).await;
    }

    let path = Path::new(input);
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::ValidationError(format!("failed to read {}: {}", input, e)))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(input)
        .to_string();

    service.generate_from_file(&file_name, bytes, request).await
}
