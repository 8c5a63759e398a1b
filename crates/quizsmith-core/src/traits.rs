//! Core trait definitions for LLM providers.
//!
//! The async trait is implemented by the `quizsmith-providers` crate.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// A stream of text fragments from a completion call.
pub type FragmentStream = BoxStream<'static, anyhow::Result<String>>;

/// Trait for LLM backends that stream text completions.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Start a streaming completion. Errors before the first fragment (bad
    /// status, auth) are returned directly; errors mid-stream arrive as items.
    async fn stream(&self, request: &CompletionRequest) -> anyhow::Result<FragmentStream>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;

    /// Run a completion and concatenate every streamed fragment.
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
        let mut fragments = self.stream(request).await?;
        let mut content = String::new();
        while let Some(fragment) = fragments.next().await {
            content.push_str(&fragment?);
        }
        Ok(content)
    }
}

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request for a streamed completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g. "gemini-1.5-flash").
    pub model: String,
    /// Conversation so far; the last message is the one being answered.
    pub messages: Vec<ChatMessage>,
    /// Optional system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl CompletionRequest {
    /// A single-turn request.
    pub fn single(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            system_prompt: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Text of the last user message.
    pub fn last_prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Default completion length.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    struct Fragments(Vec<&'static str>);

    #[async_trait]
    impl LlmProvider for Fragments {
        fn name(&self) -> &str {
            "fragments"
        }

        async fn stream(&self, _request: &CompletionRequest) -> anyhow::Result<FragmentStream> {
            let items: Vec<anyhow::Result<String>> =
                self.0.iter().map(|s| Ok(s.to_string())).collect();
            Ok(stream::iter(items).boxed())
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    struct FailsMidStream;

    #[async_trait]
    impl LlmProvider for FailsMidStream {
        fn name(&self) -> &str {
            "fails"
        }

        async fn stream(&self, _request: &CompletionRequest) -> anyhow::Result<FragmentStream> {
            let items: Vec<anyhow::Result<String>> =
                vec![Ok("partial".into()), Err(anyhow::anyhow!("connection reset"))];
            Ok(stream::iter(items).boxed())
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    #[tokio::test]
    async fn complete_concatenates_fragments() {
        let provider = Fragments(vec!["What is ", "2+2?\nA) 1", "\nB) 2"]);
        let text = provider
            .complete(&CompletionRequest::single("m", "hi"))
            .await
            .unwrap();
        assert_eq!(text, "What is 2+2?\nA) 1\nB) 2");
    }

    #[tokio::test]
    async fn complete_propagates_stream_errors() {
        let err = FailsMidStream
            .complete(&CompletionRequest::single("m", "hi"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn last_prompt_skips_assistant_turns() {
        let mut request = CompletionRequest::single("m", "first");
        request.messages.push(ChatMessage::assistant("reply"));
        assert_eq!(request.last_prompt(), "first");
        request.messages.push(ChatMessage::user("second"));
        assert_eq!(request.last_prompt(), "second");
    }
}
