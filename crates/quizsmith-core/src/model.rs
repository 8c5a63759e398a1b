//! Core data model types for quizsmith.
//!
//! These are the fundamental types that the rest of quizsmith uses to
//! represent grades, questions, and generated quizzes.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::QuizError;
use crate::parser::{MalformedBlock, ParseIssue};

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question parsed from model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text.
    pub prompt: String,
    /// The four options, in the order the model produced them.
    pub options: [String; OPTION_COUNT],
    /// The answer key as the model wrote it (e.g. "D" or "D) 4").
    pub correct_answer: String,
}

impl Question {
    pub fn new(
        prompt: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            options,
            correct_answer: correct_answer.into(),
        }
    }

    /// Index of the option the answer key identifies.
    ///
    /// An option matches when it equals the key verbatim, or when its leading
    /// label (`"D"` in `"D) 4"`) equals the key. Returns `None` unless exactly
    /// one option matches.
    pub fn answer_index(&self) -> Option<usize> {
        let verbatim: Vec<usize> = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, o)| o.as_str() == self.correct_answer)
            .map(|(i, _)| i)
            .collect();
        if !verbatim.is_empty() {
            return (verbatim.len() == 1).then(|| verbatim[0]);
        }

        let key = self
            .correct_answer
            .trim_end_matches([')', '.', ':'])
            .trim_start_matches('(');
        let by_label: Vec<usize> = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, o)| option_label(o) == Some(key))
            .map(|(i, _)| i)
            .collect();
        (by_label.len() == 1).then(|| by_label[0])
    }

    /// The answer string a user submits when picking option `index`.
    ///
    /// Uses the same form as `correct_answer`: the full option text when the
    /// key is written out verbatim, otherwise the option's label.
    pub fn answer_for_option(&self, index: usize) -> Result<String, QuizError> {
        let option = self
            .options
            .get(index)
            .ok_or(QuizError::OptionOutOfRange { index })?;

        if self.options.iter().any(|o| *o == self.correct_answer) {
            return Ok(option.clone());
        }
        Ok(option_label(option)
            .map(str::to_string)
            .unwrap_or_else(|| option.clone()))
    }
}

/// Leading label of an option line: `"A"` for `"A) 1"`, `"b"` for `"b. two"`.
pub fn option_label(option: &str) -> Option<&str> {
    let trimmed = option.trim_start().trim_start_matches('(');
    let end = trimmed.find([')', '.', ':'])?;
    let label = trimmed[..end].trim();
    let valid = !label.is_empty()
        && label.chars().count() <= 2
        && label.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(label)
}

/// School grade levels a quiz can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 12;

    pub fn new(level: u8) -> Result<Self, QuizError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(QuizError::InvalidGrade(level.to_string()))
        }
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// All supported grades in ascending order.
    pub fn all() -> impl Iterator<Item = Grade> {
        (Self::MIN..=Self::MAX).map(Grade)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grade {}", self.0)
    }
}

impl FromStr for Grade {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let digits = lower.strip_prefix("grade").unwrap_or(&lower).trim();
        digits
            .parse::<u8>()
            .ok()
            .and_then(|n| Grade::new(n).ok())
            .ok_or_else(|| QuizError::InvalidGrade(s.to_string()))
    }
}

impl TryFrom<String> for Grade {
    type Error = QuizError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.to_string()
    }
}

/// A quiz produced by one `generate` call, with its parse diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuiz {
    /// Unique quiz identifier.
    pub id: Uuid,
    /// When the quiz was generated.
    pub created_at: DateTime<Utc>,
    pub topic: String,
    pub grade: Grade,
    /// Model that produced the questions.
    pub model: String,
    /// Parsed questions, in model order.
    pub questions: Vec<Question>,
    /// Blocks of model output that could not be parsed.
    #[serde(default)]
    pub dropped_blocks: Vec<MalformedBlock>,
    /// Questions that parsed but look suspicious.
    #[serde(default)]
    pub issues: Vec<ParseIssue>,
    /// Number of model calls it took.
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Total model latency in milliseconds.
    #[serde(default)]
    pub latency_ms: u64,
}

fn default_attempts() -> u32 {
    1
}

impl GeneratedQuiz {
    /// Save the quiz as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize quiz")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write quiz to {}", path.display()))?;
        Ok(())
    }

    /// Load a quiz from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read quiz from {}", path.display()))?;
        let quiz: GeneratedQuiz =
            serde_json::from_str(&content).context("failed to parse quiz JSON")?;
        Ok(quiz)
    }
}
