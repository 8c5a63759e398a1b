//! The `quizsmith score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizsmith_core::model::GeneratedQuiz;
use quizsmith_core::scoring::score;
use quizsmith_report::html::{generate_html, write_html_report};

use super::report_table;

pub fn execute(
    quiz_path: PathBuf,
    answers_path: PathBuf,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let quiz = GeneratedQuiz::load_json(&quiz_path)?;
    let content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers: {}", answers_path.display()))?;
    // Answers are compared verbatim; `lines` only drops the line terminator.
    let answers: Vec<&str> = content.lines().collect();

    let report = score(&quiz.questions, &answers)?;

    if let ("html", Some(path)) = (format.as_str(), &output) {
        write_html_report(&quiz, &report, path)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
        eprintln!("HTML report: {}", path.display());
        return Ok(());
    }

    let rendered = match format.as_str() {
        "text" => format!(
            "{}\nYour score is: {:.1}% ({}/{} correct)\n",
            report_table(&report),
            report.score_percent,
            report.correct_count,
            report.total_count()
        ),
        "json" => serde_json::to_string_pretty(&report)?,
        "markdown" => report.to_markdown(),
        "html" => generate_html(&quiz, &report),
        other => anyhow::bail!("unknown format: {other} (expected text, json, markdown or html)"),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write report: {}", path.display()))?;
            eprintln!("Report saved to: {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
