//! The `quizsmith chat` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizsmith_core::chat::ChatSession;
use quizsmith_providers::config::load_config_from;

use super::provider_from_config;

pub async fn execute(
    message: Option<String>,
    provider: Option<String>,
    model: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let provider = provider_from_config(&config, provider.as_deref())?;
    let model = model.unwrap_or_else(|| config.default_model.clone());

    let mut session = ChatSession::new(model)
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.max_tokens);

    if let Some(message) = message {
        let reply = session.send(provider.as_ref(), &message).await?;
        println!("{reply}");
        return Ok(());
    }

    eprintln!("Chatting with {}. Type /clear to reset, /exit to quit.", provider.name());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("you> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("failed to read message")?;
        match line.trim() {
            "" => continue,
            "/exit" | "/quit" => break,
            "/clear" => {
                session.clear();
                eprintln!("History cleared.");
            }
            text => match session.send(provider.as_ref(), text).await {
                Ok(reply) => println!("{reply}\n"),
                Err(e) => eprintln!("Error: {e:#}"),
            },
        }
    }

    Ok(())
}
