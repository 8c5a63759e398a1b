//! The `quizsmith take` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizsmith_core::model::{option_label, GeneratedQuiz, Question};
use quizsmith_core::session::QuizSession;

use super::report_table;

pub fn execute(quiz_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let quiz = GeneratedQuiz::load_json(&quiz_path)?;
    anyhow::ensure!(!quiz.questions.is_empty(), "quiz has no questions");

    println!("{} quiz on \"{}\" ({} questions)", quiz.grade, quiz.topic, quiz.questions.len());
    println!("Answer with an option label or number; leave blank to skip.\n");

    let mut session = QuizSession::new(quiz.questions);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    for i in 0..session.len() {
        let question = &session.questions()[i];
        println!("{}. {}", i + 1, question.prompt);
        for option in &question.options {
            println!("   {option}");
        }
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("failed to read answer")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match pick_option(question, input) {
            Some(option) => session.choose_option(i, option)?,
            None => session.answer(i, input)?,
        }
        println!();
    }

    let skipped = session.unanswered();
    let report = session.submit()?;

    println!("{}", report_table(&report));
    println!(
        "Your score is: {:.1}% ({}/{} correct)",
        report.score_percent,
        report.correct_count,
        report.total_count()
    );
    if skipped > 0 {
        println!("{skipped} question(s) left unanswered.");
    }

    if let Some(path) = output {
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

/// Map user input to an option index: a label such as `B` or a 1-based number.
fn pick_option(question: &Question, input: &str) -> Option<usize> {
    if let Ok(n) = input.parse::<usize>() {
        if (1..=question.options.len()).contains(&n) {
            return Some(n - 1);
        }
    }
    question.options.iter().position(|option| {
        option_label(option).is_some_and(|label| label.eq_ignore_ascii_case(input))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new(
            "What is 2+2?",
            ["A) 1", "B) 2", "C) 3", "D) 4"].map(String::from),
            "D",
        )
    }

    #[test]
    fn picks_by_label_or_number() {
        let q = question();
        assert_eq!(pick_option(&q, "D"), Some(3));
        assert_eq!(pick_option(&q, "b"), Some(1));
        assert_eq!(pick_option(&q, "1"), Some(0));
        assert_eq!(pick_option(&q, "5"), None);
        assert_eq!(pick_option(&q, "four"), None);
    }
}
