//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REPLY: &str = "What is 2+2?
A) 1
B) 2
C) 3
D) 4
Correct answer: D

Which planet is closest to the Sun?
A) Venus
B) Mercury
C) Earth
D) Mars
Correct answer: B

Broken block
A) only one option
";

fn quizsmith() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quizsmith").unwrap()
}

/// A working directory with a mock-provider config and canned reply.
fn offline_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("reply.txt"), REPLY).unwrap();
    std::fs::write(
        dir.path().join("quizsmith.toml"),
        r#"
default_provider = "offline"
default_model = "mock-model"
question_count = 2

[providers.offline]
type = "mock"
response_file = "reply.txt"
"#,
    )
    .unwrap();
    dir
}

/// Run `generate` in `dir` and return the saved quiz path.
fn generate_quiz(dir: &Path) -> PathBuf {
    quizsmith()
        .current_dir(dir)
        .args(["generate", "--topic", "space", "--grade", "Grade 4", "--output", "out"])
        .assert()
        .success();

    let mut quizzes: Vec<PathBuf> = std::fs::read_dir(dir.join("out"))
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    assert_eq!(quizzes.len(), 1);
    quizzes.pop().unwrap()
}

#[test]
fn help_lists_commands() {
    quizsmith()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("score"))
        .stdout(predicate::str::contains("chat"));
}

#[test]
fn version_flag() {
    quizsmith()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizsmith"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizsmith()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizsmith.toml"))
        .stdout(predicate::str::contains("Created samples/quiz-reply.txt"));

    assert!(dir.path().join("quizsmith.toml").exists());
    assert!(dir.path().join("samples/quiz-reply.txt").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizsmith().current_dir(dir.path()).arg("init").assert().success();
    quizsmith()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}

#[test]
fn init_sample_reply_checks_clean() {
    let dir = TempDir::new().unwrap();
    quizsmith().current_dir(dir.path()).arg("init").assert().success();

    quizsmith()
        .current_dir(dir.path())
        .args(["check", "--file", "samples/quiz-reply.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions"))
        .stdout(predicate::str::contains("All blocks valid."));
}

#[test]
fn check_reports_dropped_blocks() {
    let dir = offline_workspace();

    quizsmith()
        .current_dir(dir.path())
        .args(["check", "--file", "reply.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions"))
        .stdout(predicate::str::contains("[block 2]"))
        .stdout(predicate::str::contains("1 warning(s) found."));
}

#[test]
fn check_strict_fails_on_malformed_block() {
    let dir = offline_workspace();

    quizsmith()
        .current_dir(dir.path())
        .args(["check", "--file", "reply.txt", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("block 2 is malformed"));
}

#[test]
fn check_nonexistent_file() {
    quizsmith()
        .args(["check", "--file", "nonexistent.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn generate_with_mock_provider() {
    let dir = offline_workspace();

    quizsmith()
        .current_dir(dir.path())
        .args(["generate", "--topic", "space", "--grade", "4", "--output", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. What is 2+2?"))
        .stdout(predicate::str::contains("2. Which planet is closest to the Sun?"))
        .stderr(predicate::str::contains("Quiz saved to:"));
}

#[test]
fn generate_rejects_empty_topic() {
    let dir = offline_workspace();

    quizsmith()
        .current_dir(dir.path())
        .args(["generate", "--topic", "  ", "--grade", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("topic must not be empty"));
}

#[test]
fn generate_rejects_invalid_grade() {
    let dir = offline_workspace();

    quizsmith()
        .current_dir(dir.path())
        .args(["generate", "--topic", "space", "--grade", "Grade 13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid grade"));
}

#[test]
fn generate_unknown_provider() {
    let dir = offline_workspace();

    quizsmith()
        .current_dir(dir.path())
        .args(["generate", "--topic", "space", "--grade", "4", "--provider", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("provider 'nope' not found"));
}

#[test]
fn score_answers_file() {
    let dir = offline_workspace();
    let quiz = generate_quiz(dir.path());
    std::fs::write(dir.path().join("answers.txt"), "D\nA\n").unwrap();

    quizsmith()
        .current_dir(dir.path())
        .arg("score")
        .arg("--quiz")
        .arg(&quiz)
        .args(["--answers", "answers.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Your score is: 50.0% (1/2 correct)"));
}

#[test]
fn score_compares_answers_verbatim() {
    let dir = offline_workspace();
    let quiz = generate_quiz(dir.path());
    std::fs::write(dir.path().join("answers.txt"), " D\r\nB \r\n").unwrap();

    quizsmith()
        .current_dir(dir.path())
        .arg("score")
        .arg("--quiz")
        .arg(&quiz)
        .args(["--answers", "answers.txt", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"correct_count\": 0"))
        .stdout(predicate::str::contains("\"submitted_answer\": \" D\""));
}

#[test]
fn score_markdown_and_html() {
    let dir = offline_workspace();
    let quiz = generate_quiz(dir.path());
    std::fs::write(dir.path().join("answers.txt"), "D\nB\n").unwrap();

    quizsmith()
        .current_dir(dir.path())
        .arg("score")
        .arg("--quiz")
        .arg(&quiz)
        .args(["--answers", "answers.txt", "--format", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Score:** 100.0% (2/2 correct)"))
        .stdout(predicate::str::contains("| Q2 | B | B | correct |"));

    quizsmith()
        .current_dir(dir.path())
        .arg("score")
        .arg("--quiz")
        .arg(&quiz)
        .args(["--answers", "answers.txt", "--format", "html", "--output", "report.html"])
        .assert()
        .success();

    let html = std::fs::read_to_string(dir.path().join("report.html")).unwrap();
    assert!(html.contains("<svg"));
    assert!(html.contains("100.0%"));
}

#[test]
fn score_length_mismatch_fails() {
    let dir = offline_workspace();
    let quiz = generate_quiz(dir.path());
    std::fs::write(dir.path().join("answers.txt"), "D\n").unwrap();

    quizsmith()
        .current_dir(dir.path())
        .arg("score")
        .arg("--quiz")
        .arg(&quiz)
        .args(["--answers", "answers.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 2 answers, got 1"));
}

#[test]
fn take_reads_answers_from_stdin() {
    let dir = offline_workspace();
    let quiz = generate_quiz(dir.path());

    quizsmith()
        .current_dir(dir.path())
        .arg("take")
        .arg("--quiz")
        .arg(&quiz)
        .write_stdin("D\n2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Your score is: 100.0% (2/2 correct)"));
}

#[test]
fn take_counts_skipped_questions() {
    let dir = offline_workspace();
    let quiz = generate_quiz(dir.path());

    quizsmith()
        .current_dir(dir.path())
        .arg("take")
        .arg("--quiz")
        .arg(&quiz)
        .write_stdin("\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Your score is: 0.0% (0/2 correct)"))
        .stdout(predicate::str::contains("2 question(s) left unanswered."));
}

#[test]
fn chat_one_shot_with_mock_provider() {
    let dir = offline_workspace();

    quizsmith()
        .current_dir(dir.path())
        .args(["chat", "--message", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("What is 2+2?"));
}

#[test]
fn list_models_with_mock_provider() {
    let dir = offline_workspace();

    quizsmith()
        .current_dir(dir.path())
        .args(["list-models", "--provider", "offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Provider: offline"))
        .stdout(predicate::str::contains("mock-model"));
}
