//! Generative-text collaborator client
//!
//! One concern: turn a transcript plus a context summary into the next
//! spoken line, over an OpenAI-compatible chat-completions API. Every
//! call is bounded by a timeout; callers treat any error as "use the
//! scripted line instead", never as a user-visible failure.

pub mod backend;
pub mod prompt;

pub use backend::{ChatBackend, GenerationResult, LlmConfig, OpenAiBackend};
pub use prompt::{Message, PromptBuilder, Role};

use thiserror::Error;

/// Collaborator errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}
