//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use quizsmith_core::model::GeneratedQuiz;
use quizsmith_core::report::QuizReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML performance report for a scored quiz.
pub fn generate_html(quiz: &GeneratedQuiz, report: &QuizReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizsmith report: {}</title>\n",
        html_escape(&quiz.topic)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Quiz Performance</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Topic: <strong>{}</strong> | {} | {} questions | {} | {}</p>\n",
        html_escape(&quiz.topic),
        quiz.grade,
        report.total_count(),
        html_escape(&quiz.model),
        quiz.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"score\">Your score is: <strong>{:.1}%</strong> ({}/{} correct)</p>\n",
        report.score_percent,
        report.correct_count,
        report.total_count()
    ));
    if !quiz.dropped_blocks.is_empty() {
        html.push_str(&format!(
            "<p class=\"warning\">{} block(s) of model output could not be parsed and were left out.</p>\n",
            quiz.dropped_blocks.len()
        ));
    }

    if !report.results.is_empty() {
        html.push_str(&generate_bar_chart(report));
    }
    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Performance Report</h2>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str("<thead><tr><th>Question</th><th>Prompt</th><th>Your Answer</th><th>Correct Answer</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for (i, r) in report.results.iter().enumerate() {
        let class = if r.is_correct { "pass" } else { "fail" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>Q{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            i + 1,
            html_escape(&r.question.prompt),
            html_escape(&r.submitted_answer),
            html_escape(&r.question.correct_answer),
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(quiz: &GeneratedQuiz, report: &QuizReport, path: &Path) -> Result<()> {
    let html = generate_html(quiz, report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// One bar per question: full height, green if correct, red otherwise.
fn generate_bar_chart(report: &QuizReport) -> String {
    let bar_width = 36;
    let max_height = 160;
    let padding = 12;
    let label_height = 24;
    let axis_width = 40;

    let total_width = axis_width + report.results.len() * (bar_width + padding) + padding;
    let total_height = max_height + label_height + padding;

    let mut svg = format!(
        "<svg width=\"{total_width}\" height=\"{total_height}\" xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" aria-label=\"Quiz Performance\">\n"
    );
    svg.push_str(&format!(
        "  <text x=\"4\" y=\"{}\" font-size=\"12\" fill=\"currentColor\">1</text>\n",
        padding + 4
    ));
    svg.push_str(&format!(
        "  <text x=\"4\" y=\"{}\" font-size=\"12\" fill=\"currentColor\">0</text>\n",
        padding + max_height
    ));

    for (i, r) in report.results.iter().enumerate() {
        let x = axis_width + i * (bar_width + padding) + padding;
        let (height, color) = if r.is_correct {
            (max_height, "#22c55e")
        } else {
            (max_height / 20, "#ef4444")
        };
        let y = padding + max_height - height;

        svg.push_str(&format!(
            "  <rect class=\"{}\" x=\"{x}\" y=\"{y}\" width=\"{bar_width}\" height=\"{height}\" fill=\"{color}\" rx=\"3\"/>\n",
            if r.is_correct { "bar-correct" } else { "bar-incorrect" }
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" text-anchor=\"middle\">Q{}</text>\n",
            x + bar_width / 2,
            padding + max_height + label_height - 6,
            i + 1
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { font-size: 1.25rem; }
.warning { color: #b45309; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
