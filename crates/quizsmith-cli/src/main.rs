//! quizsmith CLI: generate, take and score LLM-written quizzes.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizsmith", version, about = "LLM-generated multiple-choice quizzes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz with a language model
    Generate {
        /// Quiz topic (e.g. "photosynthesis")
        #[arg(long)]
        topic: String,

        /// Target grade ("Grade 7", "grade7" or "7")
        #[arg(long)]
        grade: String,

        /// Number of questions to request (default from config)
        #[arg(long)]
        questions: Option<usize>,

        /// Provider name from the config file
        #[arg(long)]
        provider: Option<String>,

        /// Model to use (default from config)
        #[arg(long)]
        model: Option<String>,

        /// Output directory (default from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Take a saved quiz interactively on stdin
    Take {
        /// Quiz JSON written by `generate`
        #[arg(long)]
        quiz: PathBuf,

        /// Save the report JSON here
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Score a saved quiz against an answers file
    Score {
        /// Quiz JSON written by `generate`
        #[arg(long)]
        quiz: PathBuf,

        /// Answers file, one answer per line in question order
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Parse raw model output offline and report malformed blocks
    Check {
        /// Text file holding a model reply
        #[arg(long)]
        file: PathBuf,

        /// Fail on the first malformed block
        #[arg(long)]
        strict: bool,
    },

    /// Ask the model questions; starts a REPL without --message
    Chat {
        /// Send a single message and exit
        #[arg(long)]
        message: Option<String>,

        /// Provider name from the config file
        #[arg(long)]
        provider: Option<String>,

        /// Model to use (default from config)
        #[arg(long)]
        model: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizsmith=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            topic,
            grade,
            questions,
            provider,
            model,
            output,
            config,
        } => {
            commands::generate::execute(topic, grade, questions, provider, model, output, config)
                .await
        }
        Commands::Take { quiz, output } => commands::take::execute(quiz, output),
        Commands::Score {
            quiz,
            answers,
            format,
            output,
        } => commands::score::execute(quiz, answers, format, output),
        Commands::Check { file, strict } => commands::check::execute(file, strict),
        Commands::Chat {
            message,
            provider,
            model,
            config,
        } => commands::chat::execute(message, provider, model, config).await,
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
