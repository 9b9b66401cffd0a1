use std::sync::{Arc, Mutex};

use validator::Validate;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::domain::quiz::Quiz;
use crate::models::domain::source_content::SourceContent;
use crate::models::dto::request::QuizRequestConfig;
use crate::services::content_extractor::ContentExtractor;
use crate::services::model_service::{GeminiClient, GenerationBackend};
use crate::services::prompt_builder::PromptBuilder;
use crate::services::response_parser::ResponseParser;

/// Explicit busy state machine for the single-in-flight-request policy,
/// independent of any UI-level "disable the button while loading" logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

#[derive(Debug)]
pub struct GenerationGuard {
    state: Mutex<GenerationState>,
}

impl Default for GenerationGuard {
    fn default() -> Self {
        Self {
            state: Mutex::new(GenerationState::Idle),
        }
    }
}

impl GenerationGuard {
    // The state is Copy and valid in every variant, so a lock poisoned by
    // a panicking holder can be recovered rather than cascading the panic.
    fn lock_state(&self) -> std::sync::MutexGuard<'_, GenerationState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn state(&self) -> GenerationState {
        *self.lock_state()
    }

    /// Transitions to `Requesting`, or fails with `Busy` when a request is
    /// already outstanding. The returned token records the terminal state;
    /// dropping it without completion counts as a failure.
    pub fn begin(&self) -> AppResult<InFlight<'_>> {
        let mut state = self.lock_state();
        if *state == GenerationState::Requesting {
            return Err(AppError::Busy(
                "A quiz is already being generated. Please wait for it to finish.".to_string(),
            ));
        }
        *state = GenerationState::Requesting;
        Ok(InFlight {
            guard: self,
            completed: false,
        })
    }

    fn finish(&self, terminal: GenerationState) {
        *self.lock_state() = terminal;
    }
}

#[derive(Debug)]
pub struct InFlight<'a> {
    guard: &'a GenerationGuard,
    completed: bool,
}

impl InFlight<'_> {
    pub fn succeed(mut self) {
        self.completed = true;
        self.guard.finish(GenerationState::Succeeded);
    }

    pub fn fail(mut self) {
        self.completed = true;
        self.guard.finish(GenerationState::Failed);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.guard.finish(GenerationState::Failed);
        }
    }
}

/// Orchestrates one submission: extract, build the prompt, call the model,
/// parse. Strictly sequential; each invocation is an independent pipeline
/// over freshly captured inputs.
pub struct QuizService {
    extractor: ContentExtractor,
    backend: Arc<dyn GenerationBackend>,
    guard: GenerationGuard,
}

impl QuizService {
    pub fn new(config: Config) -> AppResult<Self> {
        let extractor = ContentExtractor::new(&config);
        let backend = Arc::new(GeminiClient::new(config)?);
        Ok(Self::with_backend(extractor, backend))
    }

    pub fn with_backend(extractor: ContentExtractor, backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            extractor,
            backend,
            guard: GenerationGuard::default(),
        }
    }

    pub fn generation_state(&self) -> GenerationState {
        self.guard.state()
    }

    /// The single entry point the surrounding application uses. Validation
    /// happens synchronously, before the guard is taken and before any
    /// asynchronous work starts.
    pub async fn submit_content(
        &self,
        content: SourceContent,
        config: QuizRequestConfig,
    ) -> AppResult<Quiz> {
        config.validate()?;
        content.validate()?;

        let in_flight = self.guard.begin()?;

        let request = PromptBuilder::build(&content, &config);
        match self.backend.generate(request).await {
            Ok(raw) => {
                let quiz = ResponseParser::parse(&raw, config.question_count);
                log::info!(
                    "Generated quiz {} with {} questions (fallback: {})",
                    quiz.id,
                    quiz.len(),
                    quiz.fallback
                );
                in_flight.succeed();
                Ok(quiz)
            }
            Err(err) => {
                in_flight.fail();
                Err(err)
            }
        }
    }

    pub async fn generate_from_text(
        &self,
        text: &str,
        config: QuizRequestConfig,
    ) -> AppResult<Quiz> {
        let content = self.extractor.from_pasted_text(text)?;
        self.submit_content(content, config).await
    }

    /// Document parsing is CPU-bound, so it runs off the async executor.
    pub async fn generate_from_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        config: QuizRequestConfig,
    ) -> AppResult<Quiz> {
        let extractor = self.extractor.clone();
        let name = file_name.to_string();
        let content = tokio::task::spawn_blocking(move || extractor.from_file(&name, bytes))
            .await
            .map_err(|e| AppError::ExtractionError(format!("Extraction task failed: {}", e)))??;

        self.submit_content(content, config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::model_service::MockGenerationBackend;
    use crate::test_utils::fixtures;

    fn service_with(backend: MockGenerationBackend) -> QuizService {
        QuizService::with_backend(ContentExtractor::default(), Arc::new(backend))
    }

    #[tokio::test]
    async fn france_scenario_end_to_end() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_| Ok(fixtures::FRANCE_REPLY.to_string()));
        let service = service_with(backend);

        let quiz = service
            .submit_content(
                SourceContent::text("The capital of France is Paris."),
                fixtures::test_request_config(5),
            )
            .await
            .unwrap();

        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz.questions[0].answer, "B");
        assert!(!quiz.fallback);
        assert_eq!(service.generation_state(), GenerationState::Succeeded);
    }

    #[tokio::test]
    async fn too_short_text_never_reaches_the_backend() {
        let mut backend = MockGenerationBackend::new();
        backend.expect_generate().times(0);
        let service = service_with(backend);

        let err = service
            .submit_content(SourceContent::text("ab"), fixtures::test_request_config(5))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(service.generation_state(), GenerationState::Idle);
    }

    #[tokio::test]
    async fn invalid_question_count_never_reaches_the_backend() {
        let mut backend = MockGenerationBackend::new();
        backend.expect_generate().times(0);
        let service = service_with(backend);

        let err = service
            .submit_content(
                SourceContent::text("long enough text for a quiz"),
                fixtures::test_request_config(4),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn remote_failure_ends_in_failed_state() {
        let mut backend = MockGenerationBackend::new();
        backend.expect_generate().times(1).returning(|_| {
            Err(AppError::RemoteRequestError("rate limit".to_string()))
        });
        let service = service_with(backend);

        let err = service
            .generate_from_text(
                "plenty of text to build a quiz from",
                fixtures::test_request_config(5),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RemoteRequestError(_)));
        assert_eq!(service.generation_state(), GenerationState::Failed);
    }

    #[tokio::test]
    async fn unparseable_reply_still_produces_a_quiz() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_| Ok("no json here, sorry".to_string()));
        let service = service_with(backend);

        let quiz = service
            .generate_from_text(
                "plenty of text to build a quiz from",
                fixtures::test_request_config(6),
            )
            .await
            .unwrap();

        assert!(quiz.fallback);
        assert_eq!(quiz.len(), 6);
        assert_eq!(service.generation_state(), GenerationState::Succeeded);
    }

    #[tokio::test]
    async fn file_submission_sends_the_payload_to_the_model() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .times(1)
            .withf(|request| request.contents[0].parts.len() == 2)
            .returning(|_| Ok(fixtures::FRANCE_REPLY.to_string()));
        let service = service_with(backend);

        // Garbage PDF bytes: the extractor falls back to a raw payload.
        let quiz = service
            .generate_from_file(
                "scan.pdf",
                b"%PDF-1.4 scanned pages only".to_vec(),
                fixtures::test_request_config(5),
            )
            .await
            .unwrap();

        assert_eq!(quiz.len(), 1);
    }

    #[test]
    fn guard_rejects_a_second_begin_while_requesting() {
        let guard = GenerationGuard::default();

        let in_flight = guard.begin().unwrap();
        assert_eq!(guard.state(), GenerationState::Requesting);

        let err = guard.begin().unwrap_err();
        assert!(matches!(err, AppError::Busy(_)));

        in_flight.succeed();
        assert_eq!(guard.state(), GenerationState::Succeeded);

        // Terminal states allow a fresh request.
        let in_flight = guard.begin().unwrap();
        in_flight.fail();
        assert_eq!(guard.state(), GenerationState::Failed);
    }

    /// Completes only after a delay, holding the guard in `Requesting`
    /// long enough for a second submission to overlap.
    struct SlowBackend;

    #[async_trait::async_trait]
    impl crate::services::model_service::GenerationBackend for SlowBackend {
        async fn generate(
            &self,
            _request: crate::models::dto::gemini_dto::GenerateContentRequest,
        ) -> crate::errors::AppResult<String> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok(fixtures::FRANCE_REPLY.to_string())
        }
    }

    #[tokio::test]
    async fn overlapping_submissions_reject_the_second_with_busy() {
        let service =
            QuizService::with_backend(ContentExtractor::default(), Arc::new(SlowBackend));

        let first = service.submit_content(
            SourceContent::text("The capital of France is Paris."),
            fixtures::test_request_config(5),
        );
        let second = service.submit_content(
            SourceContent::text("The capital of France is Paris."),
            fixtures::test_request_config(5),
        );

        // The first future takes the guard on its initial poll and then
        // parks on the backend; the second must observe `Requesting`.
        let (first, second) = tokio::join!(first, second);

        let quiz = first.expect("the in-flight submission should complete");
        assert_eq!(quiz.len(), 1);
        assert!(matches!(second.unwrap_err(), AppError::Busy(_)));
        assert_eq!(service.generation_state(), GenerationState::Succeeded);
    }

    #[test]
    fn guard_recovers_from_a_poisoned_lock() {
        let guard = GenerationGuard::default();

        let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _held = guard.state.lock().unwrap();
            panic!("poison while holding the state lock");
        }));
        assert!(panicked.is_err());

        // The guard stays usable: reads and transitions keep working.
        assert_eq!(guard.state(), GenerationState::Idle);
        guard.begin().unwrap().succeed();
        assert_eq!(guard.state(), GenerationState::Succeeded);
    }

    #[test]
    fn dropping_the_token_without_completion_records_a_failure() {
        let guard = GenerationGuard::default();
        {
            let _in_flight = guard.begin().unwrap();
        }
        assert_eq!(guard.state(), GenerationState::Failed);
    }
}
