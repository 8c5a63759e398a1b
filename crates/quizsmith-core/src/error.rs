//! Quiz error types.
//!
//! Input validation and contract violations surface as typed errors so that
//! callers can downcast them out of an `anyhow::Error` without string matching.

use thiserror::Error;

/// Errors raised by quiz generation, parsing, and scoring.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuizError {
    /// The quiz topic was empty or whitespace-only.
    #[error("topic must not be empty")]
    EmptyTopic,

    /// The grade label is not one of the supported grades.
    #[error("invalid grade: {0} (expected \"Grade 1\" through \"Grade 12\")")]
    InvalidGrade(String),

    /// The answers do not line up with the questions.
    #[error("expected {questions} answers, got {answers}")]
    LengthMismatch { questions: usize, answers: usize },

    /// A session index past the end of the question set.
    #[error("question index {index} out of range (quiz has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },

    /// An option index past the end of a question's options.
    #[error("option index {index} out of range (questions have 4 options)")]
    OptionOutOfRange { index: usize },

    /// A block of model output did not have the expected layout.
    #[error("block {index} is malformed: {line_count} lines, need at least 6")]
    MalformedBlock { index: usize, line_count: usize },

    /// Fewer questions parsed than were requested.
    #[error("requested {expected} questions but only {parsed} could be parsed")]
    ShortQuiz { expected: usize, parsed: usize },
}
