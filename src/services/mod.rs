pub mod content_extractor;
pub mod model_service;
pub mod prompt_builder;
pub mod quiz_service;
pub mod response_parser;
