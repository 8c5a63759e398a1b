//! Ollama (local LLM) provider implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizsmith_core::traits::{CompletionRequest, FragmentStream, LlmProvider, ModelInfo, Role};

use crate::error::{check_status, ProviderError};
use crate::stream::{fragment_stream, Frame};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TIMEOUT_SECS: u64 = 300; // Local models are slower

/// Ollama local LLM provider.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: &str) -> Self {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base.to_string(),
            client,
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize, Deserialize, Default)]
struct OllamaMessage {
    #[serde(default)]
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
    num_predict: u32,
}

/// One NDJSON line of a streamed `/api/chat` response.
#[derive(Deserialize)]
struct OllamaChunk {
    #[serde(default)]
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

fn decode_line(line: &str) -> Result<Frame, ProviderError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Frame::Skip);
    }
    let chunk: OllamaChunk =
        serde_json::from_str(line).map_err(|e| ProviderError::StreamDecode(e.to_string()))?;
    if let Some(error) = chunk.error {
        return Err(ProviderError::ApiError {
            status: 200,
            message: error,
        });
    }
    if chunk.done {
        // The final line may still carry text.
        return Ok(if chunk.message.content.is_empty() {
            Frame::Done
        } else {
            Frame::Text(chunk.message.content)
        });
    }
    Ok(if chunk.message.content.is_empty() {
        Frame::Skip
    } else {
        Frame::Text(chunk.message.content)
    })
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn stream(&self, request: &CompletionRequest) -> anyhow::Result<FragmentStream> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system_prompt {
            messages.push(OllamaMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.extend(request.messages.iter().map(|m| OllamaMessage {
            role: match m.role {
                Role::User => "user".to_string(),
                Role::Assistant => "assistant".to_string(),
            },
            content: m.content.clone(),
        }));

        let body = OllamaRequest {
            model: request.model.clone(),
            messages,
            stream: true,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_send(e, DEFAULT_TIMEOUT_SECS))?;

        let response = check_status(response, &request.model).await?;
        Ok(fragment_stream(response.bytes_stream(), decode_line))
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        // Installed models are only known to the local server.
        vec![ModelInfo {
            id: "llama3.1".into(),
            name: "Llama 3.1 (local)".into(),
            provider: "ollama".into(),
            max_context: 128_000,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ndjson(parts: &[&str]) -> String {
        let mut body: String = parts
            .iter()
            .map(|p| {
                format!(
                    "{}\n",
                    serde_json::json!({"message": {"role": "assistant", "content": p}, "done": false})
                )
            })
            .collect();
        body.push_str(
            &serde_json::json!({"message": {"role": "assistant", "content": ""}, "done": true})
                .to_string(),
        );
        body.push('\n');
        body
    }

    #[tokio::test]
    async fn streams_ndjson() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({"model": "llama3.1", "stream": true})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(ndjson(&["Q1?\nA) x", "\nB) y"]), "application/x-ndjson"),
            )
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri());
        let text = provider
            .complete(&CompletionRequest::single("llama3.1", "quiz me"))
            .await
            .unwrap();
        assert_eq!(text, "Q1?\nA) x\nB) y");
    }

    #[tokio::test]
    async fn missing_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri());
        let err = provider
            .complete(&CompletionRequest::single("nope", "x"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("model not found"));
    }

    #[test]
    fn in_stream_error_is_reported() {
        let err = decode_line(r#"{"error": "out of memory"}"#).unwrap_err();
        assert!(err.to_string().contains("out of memory"));
    }

    #[test]
    fn default_base_url() {
        let provider = OllamaProvider::new("");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
    }
}
