//! The `quizsmith init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizsmith.toml").exists() {
        println!("quizsmith.toml already exists, skipping.");
    } else {
        std::fs::write("quizsmith.toml", SAMPLE_CONFIG)?;
        println!("Created quizsmith.toml");
    }

    // Offline sample reply for the mock provider
    std::fs::create_dir_all("samples")?;
    let sample_path = Path::new("samples/quiz-reply.txt");
    if sample_path.exists() {
        println!("samples/quiz-reply.txt already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_REPLY)?;
        println!("Created samples/quiz-reply.txt");
    }

    println!("\nNext steps:");
    println!("  1. Set GOOGLE_API_KEY or edit quizsmith.toml");
    println!("  2. Run: quizsmith check --file samples/quiz-reply.txt");
    println!("  3. Run: quizsmith generate --topic \"volcanoes\" --grade 5");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizsmith configuration

default_provider = "gemini"
default_model = "gemini-1.5-flash"
default_temperature = 0.7
max_tokens = 2048
question_count = 10
output_dir = "./quizsmith-results"

# What to do when the model returns fewer questions than requested:
#   { policy = "accept" }, { policy = "reject" } or
#   { policy = "retry", max_attempts = 3 }
short_quiz = { policy = "accept" }

[providers.gemini]
type = "gemini"
api_key = "${GOOGLE_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"

[providers.offline]
type = "mock"
response_file = "samples/quiz-reply.txt"
"#;

const SAMPLE_REPLY: &str = "What is 2+2?
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
";
