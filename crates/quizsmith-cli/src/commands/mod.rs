pub mod chat;
pub mod check;
pub mod generate;
pub mod init;
pub mod list_models;
pub mod score;
pub mod take;

use std::sync::Arc;

use anyhow::Result;

use quizsmith_core::report::QuizReport;
use quizsmith_core::traits::LlmProvider;
use quizsmith_providers::{create_provider, QuizsmithConfig};

/// Instantiate the named provider, or the config's default one.
pub(crate) fn provider_from_config(
    config: &QuizsmithConfig,
    name: Option<&str>,
) -> Result<Arc<dyn LlmProvider>> {
    let name = name.unwrap_or(&config.default_provider);
    let Some(pconfig) = config.providers.get(name) else {
        anyhow::bail!(
            "provider '{}' not found in config. Available: {:?}",
            name,
            config.providers.keys().collect::<Vec<_>>()
        );
    };
    Ok(Arc::from(create_provider(name, pconfig)?))
}

/// Per-question results as a console table.
pub(crate) fn report_table(report: &QuizReport) -> comfy_table::Table {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Question", "Your Answer", "Correct Answer", "Result"]);

    for (i, r) in report.results.iter().enumerate() {
        let submitted = if r.submitted_answer.is_empty() {
            "-"
        } else {
            r.submitted_answer.as_str()
        };
        table.add_row(vec![
            Cell::new(format!("Q{}", i + 1)),
            Cell::new(submitted),
            Cell::new(&r.question.correct_answer),
            Cell::new(if r.is_correct { "correct" } else { "incorrect" }),
        ]);
    }

    table
}
