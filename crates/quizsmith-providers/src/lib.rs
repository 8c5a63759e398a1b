//! quizsmith-providers: Streaming LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for Gemini, OpenAI-compatible APIs,
//! and Ollama, plus a mock provider for offline use.

pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;
pub mod ollama;
pub mod openai;
mod stream;

pub use config::{create_provider, load_config, ProviderConfig, QuizsmithConfig};
pub use error::ProviderError;
