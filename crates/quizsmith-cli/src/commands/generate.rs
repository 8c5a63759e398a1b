//! The `quizsmith generate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizsmith_core::model::{GeneratedQuiz, Grade};
use quizsmith_core::pipeline::QuizPipeline;
use quizsmith_providers::config::load_config_from;

use super::provider_from_config;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    topic: String,
    grade: String,
    questions: Option<usize>,
    provider: Option<String>,
    model: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let grade: Grade = grade.parse()?;
    if let Some(n) = questions {
        anyhow::ensure!(n >= 1, "questions must be at least 1");
    }

    let config = load_config_from(config_path.as_deref())?;
    let provider = provider_from_config(&config, provider.as_deref())?;
    let model = model.unwrap_or_else(|| config.default_model.clone());

    let mut pipeline_config = config.pipeline_config(&model);
    if let Some(n) = questions {
        pipeline_config.question_count = n;
    }
    let requested = pipeline_config.question_count;

    eprintln!(
        "quizsmith v{}: {} questions on \"{}\" for {} ({} / {})",
        env!("CARGO_PKG_VERSION"),
        requested,
        topic.trim(),
        grade,
        provider.name(),
        model
    );

    let pipeline = QuizPipeline::new(provider, pipeline_config);
    let quiz = pipeline.generate(&topic, grade).await?;

    print_quiz(&quiz);

    if quiz.questions.len() < requested {
        eprintln!(
            "Warning: got {} of {} questions ({} malformed block(s) dropped).",
            quiz.questions.len(),
            requested,
            quiz.dropped_blocks.len()
        );
    }
    for issue in &quiz.issues {
        eprintln!("Warning: {issue:?}");
    }

    let output = output.unwrap_or_else(|| config.output_dir.clone());
    std::fs::create_dir_all(&output)?;
    let timestamp = quiz.created_at.format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("quiz-{timestamp}.json"));
    quiz.save_json(&path)?;
    eprintln!("Quiz saved to: {}", path.display());

    Ok(())
}

fn print_quiz(quiz: &GeneratedQuiz) {
    for (i, q) in quiz.questions.iter().enumerate() {
        println!("{}. {}", i + 1, q.prompt);
        for option in &q.options {
            println!("   {option}");
        }
        println!();
    }
}
