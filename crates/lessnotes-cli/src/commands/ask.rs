//! Ask command - history-aware question answering.

use super::get_database;
use anyhow::{Context, Result};
use colored::Colorize;
use lessnotes_answer::{AnswerPipeline, AskRequest, ModelAnswer};
use lessnotes_config::Config;
use lessnotes_db::SqliteVectorStore;
use lessnotes_ollama::OllamaClient;
use tokio::runtime::Runtime;

pub fn run(prompt: &str, user: i64, conversation: i64) -> Result<()> {
    let db = get_database()?;
    let config = Config::load().context("Failed to load configuration")?;

    let client =
        OllamaClient::from_config(&config.ollama).context("Failed to create Ollama client")?;

    let rt = Runtime::new().context("Failed to create async runtime")?;

    if !rt.block_on(client.is_available()) {
        anyhow::bail!(
            "Ollama is not running at {}. Start it with 'ollama serve'.",
            config.ollama.host
        );
    }

    let store = SqliteVectorStore::new(db.clone(), client.clone());
    let pipeline = AnswerPipeline::new(
        db.clone(),
        store,
        client,
        config.retrieval.top_k,
        config.answer.source_marker.clone(),
    );

    let request = AskRequest {
        conversation_id: Some(conversation),
        user_id: Some(user),
        prompt: prompt.to_string(),
    };

    println!("{} {}", "Question:".cyan().bold(), prompt);
    println!("{}", "─".repeat(70));

    let response = rt
        .block_on(pipeline.ask(&request))
        .context("Failed to answer question")?;

    // Both turns become history for the next question in this conversation.
    db.create_message(conversation, true, prompt)?;
    db.create_message(conversation, false, &response.answer)?;

    println!();
    match serde_json::from_str::<ModelAnswer>(&response.answer) {
        Ok(parsed) => {
            println!("{}", "Answer:".green().bold());
            println!("{}", parsed.answer);
            if !parsed.sources.is_empty() {
                println!();
                println!("{}", "Sources:".cyan().bold());
                for (i, source) in parsed.sources.iter().enumerate() {
                    println!("  {}. {}", i + 1, source);
                }
            }
        }
        Err(_) => {
            println!("{}", "Answer:".green().bold());
            println!("{}", response.answer);
        }
    }

    println!();
    println!("{}", serde_json::json!({ "answer": response.answer }));

    Ok(())
}
