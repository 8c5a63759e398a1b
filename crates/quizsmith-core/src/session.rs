//! Quiz sessions.
//!
//! A session owns one question set and the answers collected for it. It is
//! created when a quiz is handed out and consumed when the quiz is submitted.

use crate::error::QuizError;
use crate::model::Question;
use crate::report::QuizReport;
use crate::scoring::score;

/// Answers being collected for one quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    answers: Vec<Option<String>>,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        let answers = vec![None; questions.len()];
        Self { questions, answers }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Record a free-text answer for question `index`, replacing any earlier one.
    pub fn answer(&mut self, index: usize, answer: impl Into<String>) -> Result<(), QuizError> {
        let len = self.answers.len();
        let slot = self
            .answers
            .get_mut(index)
            .ok_or(QuizError::QuestionOutOfRange { index, len })?;
        *slot = Some(answer.into());
        Ok(())
    }

    /// Record the choice of option `option` for question `index`.
    pub fn choose_option(&mut self, index: usize, option: usize) -> Result<(), QuizError> {
        let question = self.questions.get(index).ok_or(QuizError::QuestionOutOfRange {
            index,
            len: self.questions.len(),
        })?;
        let answer = question.answer_for_option(option)?;
        self.answer(index, answer)
    }

    /// The answer recorded so far for question `index`.
    pub fn answer_at(&self, index: usize) -> Option<&str> {
        self.answers.get(index).and_then(|a| a.as_deref())
    }

    /// Number of questions still without an answer.
    pub fn unanswered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_none()).count()
    }

    /// Finish the session and score it. Unanswered questions count as "".
    pub fn submit(self) -> Result<QuizReport, QuizError> {
        let answers: Vec<String> = self
            .answers
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        score(&self.questions, &answers)
    }
}
