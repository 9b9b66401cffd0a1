pub mod gemini_dto;
pub mod request;
