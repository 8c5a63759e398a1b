//! The `quizsmith check` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizsmith_core::parser::{parse_quiz, parse_quiz_strict, ParseIssue};

pub fn execute(file: PathBuf, strict: bool) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    if strict {
        let questions = parse_quiz_strict(&content)?;
        println!("{}: {} questions", file.display(), questions.len());
        println!("All blocks valid.");
        return Ok(());
    }

    let outcome = parse_quiz(&content);
    println!("{}: {} questions", file.display(), outcome.questions.len());

    for block in &outcome.dropped {
        println!(
            "  [block {}] WARNING: {} line(s), need at least 6; dropped",
            block.index, block.line_count
        );
    }
    for issue in &outcome.issues {
        match issue {
            ParseIssue::UnmatchedAnswer {
                question,
                correct_answer,
            } => println!(
                "  [Q{}] WARNING: answer \"{}\" matches no single option",
                question + 1,
                correct_answer
            ),
            ParseIssue::EmptyAnswer { question } => {
                println!("  [Q{}] WARNING: empty answer", question + 1)
            }
        }
    }

    let warnings = outcome.dropped.len() + outcome.issues.len();
    if warnings == 0 {
        println!("All blocks valid.");
    } else {
        println!("\n{warnings} warning(s) found.");
    }

    Ok(())
}
