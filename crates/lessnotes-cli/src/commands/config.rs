//! Configuration commands.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use lessnotes_config::Config;
use std::process::Command;

pub fn show() -> Result<()> {
    let paths = get_paths()?;

    if !paths.config_file.exists() {
        anyhow::bail!("Config file not found. Run 'lessnotes init' first.");
    }

    let contents =
        std::fs::read_to_string(&paths.config_file).context("Failed to read config file")?;

    println!("{}", "Current Configuration".cyan().bold());
    println!("{}", "─".repeat(50));
    println!("{}", contents);

    Ok(())
}

pub fn edit() -> Result<()> {
    let paths = get_paths()?;

    if !paths.config_file.exists() {
        anyhow::bail!("Config file not found. Run 'lessnotes init' first.");
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "macos") {
            "open -t".to_string()
        } else {
            "nano".to_string()
        }
    });

    let parts: Vec<&str> = editor.split_whitespace().collect();
    let (cmd, args) = parts.split_first().context("Invalid editor command")?;

    let status = Command::new(cmd)
        .args(args)
        .arg(&paths.config_file)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        anyhow::bail!("Editor exited with error");
    }

    println!("{} Configuration saved.", "✓".green());

    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let paths = get_paths()?;

    let mut config = Config::load_from(&paths.config_file).context("Failed to load config")?;

    match key.split('.').collect::<Vec<_>>().as_slice() {
        ["ollama", "model"] => config.ollama.model = value.to_string(),
        ["ollama", "host"] => config.ollama.host = value.to_string(),
        ["ollama", "embedding_model"] => config.ollama.embedding_model = value.to_string(),
        ["ollama", "timeout_seconds"] => {
            config.ollama.timeout_seconds = value.parse().context("Invalid timeout value")?;
        }
        ["files", "hash_algorithm"] => config.files.hash_algorithm = value.to_string(),
        ["chunking", "window_size"] => {
            config.chunking.window_size = value.parse().context("Invalid window_size value")?;
        }
        ["chunking", "window_overlap"] => {
            config.chunking.window_overlap =
                value.parse().context("Invalid window_overlap value")?;
        }
        ["retrieval", "top_k"] => {
            config.retrieval.top_k = value.parse().context("Invalid top_k value")?;
        }
        ["answer", "source_marker"] => config.answer.source_marker = value.to_string(),
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    }

    config
        .save_to(&paths.config_file)
        .context("Failed to save config")?;

    println!("{} Set {} = {}", "✓".green(), key.cyan(), value);

    Ok(())
}
