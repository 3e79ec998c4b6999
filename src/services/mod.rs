pub mod llm_service;
pub mod quiz_parser;

pub use llm_service::{LlmService, QuizModel};
pub use quiz_parser::{clean_option, normalize_question, parse_quiz_reply, strip_code_fence};
