//! Answer scoring.

use crate::error::QuizError;
use crate::model::Question;
use crate::report::{QuizReport, QuizResult};

/// Score positionally aligned answers against a question set.
///
/// `answers[i]` is the answer to `questions[i]`; comparison is exact string
/// equality against the answer key.
pub fn score<S: AsRef<str>>(questions: &[Question], answers: &[S]) -> Result<QuizReport, QuizError> {
    if questions.len() != answers.len() {
        return Err(QuizError::LengthMismatch {
            questions: questions.len(),
            answers: answers.len(),
        });
    }

    let results = questions
        .iter()
        .zip(answers)
        .map(|(question, answer)| {
            let submitted_answer = answer.as_ref().to_string();
            QuizResult {
                is_correct: submitted_answer == question.correct_answer,
                question: question.clone(),
                submitted_answer,
            }
        })
        .collect();

    Ok(QuizReport::from_results(results))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<Question> {
        ["A", "B", "C", "D"]
            .iter()
            .enumerate()
            .map(|(i, key)| {
                Question::new(
                    format!("Q{i}"),
                    ["A) w", "B) x", "C) y", "D) z"].map(String::from),
                    *key,
                )
            })
            .collect()
    }

    #[test]
    fn all_correct_is_one_hundred() {
        let qs = questions();
        let answers: Vec<&str> = qs.iter().map(|q| q.correct_answer.as_str()).collect();
        let report = score(&qs, &answers).unwrap();
        assert_eq!(report.score_percent, 100.0);
        assert_eq!(report.correct_count, 4);
        assert_eq!(report.results.len(), qs.len());
    }

    #[test]
    fn none_correct_is_zero() {
        let qs = questions();
        let report = score(&qs, &["B", "C", "D", "A"]).unwrap();
        assert_eq!(report.score_percent, 0.0);
        assert!(report.results.iter().all(|r| !r.is_correct));
    }

    #[test]
    fn partial_score_and_breakdown() {
        let qs = questions();
        let report = score(&qs, &["A", "x", "C", ""]).unwrap();
        assert_eq!(report.correct_count, 2);
        assert_eq!(report.score_percent, 50.0);
        assert_eq!(
            report.results.iter().map(|r| r.is_correct).collect::<Vec<_>>(),
            vec![true, false, true, false]
        );
        assert_eq!(report.results[1].submitted_answer, "x");
    }

    #[test]
    fn comparison_is_exact() {
        let qs = questions();
        let report = score(&qs, &["a", "B ", " C", "D"]).unwrap();
        assert_eq!(report.correct_count, 1);
    }

    #[test]
    fn length_mismatch_fails() {
        let qs = questions();
        assert_eq!(
            score(&qs, &["A", "B"]).unwrap_err(),
            QuizError::LengthMismatch {
                questions: 4,
                answers: 2
            }
        );
        assert!(score(&qs, &["A", "B", "C", "D", "A"]).is_err());
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let report = score::<&str>(&[], &[]).unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.score_percent, 0.0);
    }
}
