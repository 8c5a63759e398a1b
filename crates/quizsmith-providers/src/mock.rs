//! Mock provider for testing and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use quizsmith_core::traits::{CompletionRequest, FragmentStream, LlmProvider, ModelInfo};

/// Size of the fragments a mock reply is streamed in.
const FRAGMENT_CHARS: usize = 16;

/// A mock LLM provider that streams canned replies without network access.
///
/// Returns configurable responses based on prompt content matching.
pub struct MockProvider {
    /// Map of prompt substring → reply.
    responses: HashMap<String, String>,
    /// Default reply if no prompt matches.
    default_response: String,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with the given prompt→reply mappings.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: String::new(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same reply.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            responses: HashMap::new(),
            default_response: response.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn stream(&self, request: &CompletionRequest) -> anyhow::Result<FragmentStream> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());

        let prompt = request.last_prompt();
        let content = self
            .responses
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        let chars: Vec<char> = content.chars().collect();
        let fragments: Vec<anyhow::Result<String>> = chars
            .chunks(FRAGMENT_CHARS)
            .map(|c| Ok(c.iter().collect()))
            .collect();
        Ok(stream::iter(fragments).boxed())
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_response() {
        let reply = "What is 2+2?\nA) 1\nB) 2\nC) 3\nD) 4\nCorrect answer: D";
        let provider = MockProvider::with_fixed_response(reply);
        let request = CompletionRequest::single("mock", "anything");

        let fragments: Vec<String> = provider
            .stream(&request)
            .await
            .unwrap()
            .map(|f| f.unwrap())
            .collect()
            .await;
        assert!(fragments.len() > 1);
        assert_eq!(fragments.concat(), reply);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn prompt_matching() {
        let mut responses = HashMap::new();
        responses.insert("volcanoes".to_string(), "Magma?\nA)\nB)\nC)\nD)\nCorrect answer: A".to_string());
        responses.insert("fractions".to_string(), "1/2?".to_string());

        let provider = MockProvider::new(responses);

        let text = provider
            .complete(&CompletionRequest::single("mock", "A quiz about volcanoes"))
            .await
            .unwrap();
        assert!(text.starts_with("Magma?"));

        let text = provider
            .complete(&CompletionRequest::single("mock", "A quiz about fractions"))
            .await
            .unwrap();
        assert_eq!(text, "1/2?");
        assert_eq!(provider.call_count(), 2);
        assert_eq!(
            provider.last_request().unwrap().last_prompt(),
            "A quiz about fractions"
        );
    }
}
