//! Conversational Q&A sessions.

use anyhow::Result;
use tracing::instrument;

use crate::traits::{
    ChatMessage, CompletionRequest, LlmProvider, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};

/// A conversation with a provider that keeps its own history.
#[derive(Debug, Clone)]
pub struct ChatSession {
    model: String,
    system_prompt: Option<String>,
    temperature: f64,
    max_tokens: u32,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            history: Vec::new(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Ask a question with the whole conversation as context.
    ///
    /// The history only grows when the reply arrives in full.
    #[instrument(skip(self, provider, message), fields(provider = provider.name(), turns = self.history.len()))]
    pub async fn send(&mut self, provider: &dyn LlmProvider, message: &str) -> Result<String> {
        let mut messages = self.history.clone();
        messages.push(ChatMessage::user(message));

        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            system_prompt: self.system_prompt.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };
        let reply = provider.complete(&request).await?;

        self.history = request.messages;
        self.history.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }
}
