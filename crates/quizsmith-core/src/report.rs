//! Quiz report types with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Outcome for a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub question: Question,
    pub submitted_answer: String,
    pub is_correct: bool,
}

/// A scored quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizReport {
    /// One result per question, in question order.
    pub results: Vec<QuizResult>,
    /// Number of correct answers.
    pub correct_count: usize,
    /// `100 * correct_count / results.len()`, or 0 for an empty quiz.
    pub score_percent: f64,
}

impl QuizReport {
    /// Build a report and derive its summary statistics.
    pub fn from_results(results: Vec<QuizResult>) -> Self {
        let correct_count = results.iter().filter(|r| r.is_correct).count();
        let score_percent = if results.is_empty() {
            0.0
        } else {
            100.0 * correct_count as f64 / results.len() as f64
        };
        Self {
            results,
            correct_count,
            score_percent,
        }
    }

    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuizReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the performance report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Score:** {:.1}% ({}/{} correct)\n\n",
            self.score_percent,
            self.correct_count,
            self.total_count()
        ));

        if self.results.is_empty() {
            return md;
        }

        md.push_str("| Question | Your Answer | Correct Answer | Result |\n");
        md.push_str("|----------|-------------|----------------|--------|\n");
        for (i, r) in self.results.iter().enumerate() {
            md.push_str(&format!(
                "| Q{} | {} | {} | {} |\n",
                i + 1,
                escape_cell(&r.submitted_answer),
                escape_cell(&r.question.correct_answer),
                if r.is_correct { "correct" } else { "incorrect" }
            ));
        }

        md
    }
}

fn escape_cell(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.replace('|', "\\|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(key: &str, answer: &str) -> QuizResult {
        QuizResult {
            question: Question::new("Q", ["A) 1", "B) 2", "C) 3", "D) 4"].map(String::from), key),
            submitted_answer: answer.into(),
            is_correct: key == answer,
        }
    }

    #[test]
    fn derives_score() {
        let report = QuizReport::from_results(vec![result("A", "A"), result("B", "C"), result("C", "C")]);
        assert_eq!(report.correct_count, 2);
        assert_eq!(report.total_count(), 3);
        assert!((report.score_percent - 66.666).abs() < 0.01);
    }

    #[test]
    fn markdown_output() {
        let report = QuizReport::from_results(vec![result("A", "A"), result("B", "")]);
        let md = report.to_markdown();
        assert!(md.contains("50.0%"));
        assert!(md.contains("| Q1 | A | A | correct |"));
        assert!(md.contains("| Q2 | - | B | incorrect |"));
    }

    #[test]
    fn json_roundtrip() {
        let report = QuizReport::from_results(vec![result("D", "D")]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        report.save_json(&path).unwrap();
        let loaded = QuizReport::load_json(&path).unwrap();
        assert_eq!(loaded, report);
    }
}
