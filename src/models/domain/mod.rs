pub mod quiz;
pub mod source_content;
pub use quiz::{Quiz, QuizQuestion};
pub use source_content::{FilePayload, SourceContent, SupportedFormat};
