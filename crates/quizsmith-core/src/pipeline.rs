//! Quiz generation pipeline.
//!
//! Prompts a provider for multiple-choice questions, drains the streamed
//! reply, and parses it into a [`GeneratedQuiz`].

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::QuizError;
use crate::model::{GeneratedQuiz, Grade};
use crate::parser::{parse_quiz, ParseOutcome, ANSWER_PREFIX};
use crate::traits::{
    ChatMessage, CompletionRequest, LlmProvider, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE,
};

/// Number of questions requested by default.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// What to do when fewer questions parse than were requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ShortQuizPolicy {
    /// Return whatever parsed.
    #[default]
    Accept,
    /// Ask again, keeping the attempt with the most questions.
    Retry { max_attempts: u32 },
    /// Fail with [`QuizError::ShortQuiz`].
    Reject,
}

/// Configuration for the quiz pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// How many questions to ask for.
    pub question_count: usize,
    /// Temperature for generation.
    pub temperature: f64,
    /// Max tokens for generation.
    pub max_tokens: u32,
    /// Optional system prompt.
    pub system_prompt: Option<String>,
    pub short_quiz: ShortQuizPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            question_count: DEFAULT_QUESTION_COUNT,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: None,
            short_quiz: ShortQuizPolicy::Accept,
        }
    }
}

/// Generates quizzes from a provider.
pub struct QuizPipeline {
    provider: Arc<dyn LlmProvider>,
    config: PipelineConfig,
}

impl QuizPipeline {
    pub fn new(provider: Arc<dyn LlmProvider>, config: PipelineConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Generate a quiz on `topic` for `grade`.
    ///
    /// Malformed blocks in the model output are dropped and listed in
    /// `dropped_blocks`; a short quiz is handled per [`ShortQuizPolicy`].
    #[instrument(skip(self), fields(provider = self.provider.name(), model = %self.config.model))]
    pub async fn generate(&self, topic: &str, grade: Grade) -> Result<GeneratedQuiz> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(QuizError::EmptyTopic.into());
        }

        let expected = self.config.question_count;
        let max_attempts = match self.config.short_quiz {
            ShortQuizPolicy::Retry { max_attempts } => max_attempts.max(1),
            _ => 1,
        };

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(build_instruction(topic, grade, expected))],
            system_prompt: self.config.system_prompt.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let start = Instant::now();
        let mut best: Option<ParseOutcome> = None;
        let mut attempts = 0;

        while attempts < max_attempts {
            attempts += 1;
            let content = self.provider.complete(&request).await?;
            let outcome = parse_quiz(&content);
            tracing::debug!(
                attempt = attempts,
                parsed = outcome.questions.len(),
                dropped = outcome.dropped.len(),
                "parsed model output"
            );

            let parsed = outcome.questions.len();
            if best
                .as_ref()
                .map_or(true, |b| parsed > b.questions.len())
            {
                best = Some(outcome);
            }
            if parsed >= expected {
                break;
            }
            if attempts < max_attempts {
                tracing::warn!(parsed, expected, attempt = attempts, "short quiz, asking again");
            }
        }

        let outcome = best.unwrap_or_default();
        let parsed = outcome.questions.len();
        if parsed < expected {
            if self.config.short_quiz == ShortQuizPolicy::Reject {
                return Err(QuizError::ShortQuiz { expected, parsed }.into());
            }
            tracing::warn!(
                parsed,
                expected,
                dropped = outcome.dropped.len(),
                "model returned fewer questions than requested"
            );
        }

        Ok(GeneratedQuiz {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            topic: topic.to_string(),
            grade,
            model: request.model,
            questions: outcome.questions,
            dropped_blocks: outcome.dropped,
            issues: outcome.issues,
            attempts,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Build the instruction sent to the model.
pub fn build_instruction(topic: &str, grade: Grade, count: usize) -> String {
    format!(
        "Generate {count} multiple-choice quiz questions for {grade} students on the topic \
         {topic}. Each question must have exactly 4 options and the correct answer.\n\
         Format every question as exactly six lines: the question, the four options \
         labelled A) to D) one per line, and a final line starting with \
         \"{ANSWER_PREFIX}\" followed by the letter of the correct option. \
         Separate questions with one blank line and do not add any other text."
    )
}
