//! Model output parser.
//!
//! Turns the free text a model returns into structured questions. The
//! expected layout is one question per block, blocks separated by a blank
//! line, each block being:
//!
//! ```text
//! What is 2+2?
//! A) 1
//! B) 2
//! C) 3
//! D) 4
//! Correct answer: D
//! ```
//!
//! The model is not forced to follow this layout, so every block is parsed
//! independently and blocks that do not fit are reported rather than
//! aborting the whole quiz.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{Question, OPTION_COUNT};

/// Delimiter between question blocks.
pub const BLOCK_DELIMITER: &str = "\n\n";

/// Prefix stripped from the answer line.
pub const ANSWER_PREFIX: &str = "Correct answer: ";

/// Minimum number of lines in a well-formed block.
pub const MIN_BLOCK_LINES: usize = 1 + OPTION_COUNT + 1;

/// A block that was dropped because it was too short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedBlock {
    /// Position of the block in the model output (0-based).
    pub index: usize,
    /// How many lines it had.
    pub line_count: usize,
}

impl From<&MalformedBlock> for QuizError {
    fn from(block: &MalformedBlock) -> Self {
        QuizError::MalformedBlock {
            index: block.index,
            line_count: block.line_count,
        }
    }
}

/// A problem with a question that parsed but may not be scorable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssue {
    /// The answer key does not identify exactly one option.
    UnmatchedAnswer {
        /// Position of the question in the parsed output.
        question: usize,
        correct_answer: String,
    },
    /// The answer key is empty.
    EmptyAnswer { question: usize },
}

/// Result of parsing one model response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOutcome {
    /// Accepted questions, in output order.
    pub questions: Vec<Question>,
    /// Blocks that were too short to be a question.
    pub dropped: Vec<MalformedBlock>,
    /// Warnings about accepted questions.
    pub issues: Vec<ParseIssue>,
}

impl ParseOutcome {
    /// True if every non-empty block became a question without issues.
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.issues.is_empty()
    }
}

/// Parse a model response, dropping malformed blocks.
pub fn parse_quiz(text: &str) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();

    for (index, block) in text.split(BLOCK_DELIMITER).enumerate() {
        if block.trim().is_empty() {
            continue;
        }
        match parse_block(block) {
            Ok(question) => {
                let position = outcome.questions.len();
                if let Some(issue) = check_answer(position, &question) {
                    tracing::debug!(block = index, ?issue, "question has answer issue");
                    outcome.issues.push(issue);
                }
                outcome.questions.push(question);
            }
            Err(line_count) => {
                tracing::debug!(block = index, line_count, "dropping malformed block");
                outcome.dropped.push(MalformedBlock { index, line_count });
            }
        }
    }

    outcome
}

/// Parse a model response, failing on the first malformed block.
pub fn parse_quiz_strict(text: &str) -> Result<Vec<Question>, QuizError> {
    let outcome = parse_quiz(text);
    match outcome.dropped.first() {
        Some(block) => Err(block.into()),
        None => Ok(outcome.questions),
    }
}

/// Parse a single block. On failure returns the block's line count.
fn parse_block(block: &str) -> Result<Question, usize> {
    let lines: Vec<&str> = block
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();

    if lines.len() < MIN_BLOCK_LINES {
        return Err(lines.len());
    }

    let options = [
        lines[1].to_string(),
        lines[2].to_string(),
        lines[3].to_string(),
        lines[4].to_string(),
    ];
    // The label may be indented or follow other text on the line.
    let correct_answer = lines[5].replace(ANSWER_PREFIX, "");
    let correct_answer = correct_answer.trim();

    Ok(Question::new(lines[0], options, correct_answer))
}

fn check_answer(position: usize, question: &Question) -> Option<ParseIssue> {
    if question.correct_answer.is_empty() {
        return Some(ParseIssue::EmptyAnswer { question: position });
    }
    if question.answer_index().is_none() {
        return Some(ParseIssue::UnmatchedAnswer {
            question: position,
            correct_answer: question.correct_answer.clone(),
        });
    }
    None
}
