//! Status command.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use lessnotes_config::Config;
use lessnotes_ollama::OllamaClient;
use tokio::runtime::Runtime;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    println!("{}", "Lessnotes Status".cyan().bold());
    println!("{}", "─".repeat(50));

    if !paths.is_initialized() {
        println!(
            "{} Not initialized. Run {} first.",
            "✗".red(),
            "lessnotes init".cyan()
        );
        return Ok(());
    }

    println!("{} Config: {}", "✓".green(), paths.config_file.display());
    println!("{} Database: {}", "✓".green(), paths.database_file.display());
    println!("{} Files: {}", "✓".green(), paths.files_dir.display());

    let config = Config::load().context("Failed to load configuration")?;
    let client =
        OllamaClient::from_config(&config.ollama).context("Failed to create Ollama client")?;

    let rt = Runtime::new().context("Failed to create async runtime")?;

    println!();
    if rt.block_on(client.is_available()) {
        println!("{} Ollama running at {}", "✓".green(), config.ollama.host);

        for model in [&config.ollama.model, &config.ollama.embedding_model] {
            match rt.block_on(client.has_model(model)) {
                Ok(true) => println!("  {} model {}", "✓".green(), model),
                Ok(false) => println!(
                    "  {} model {} missing, run {}",
                    "✗".red(),
                    model,
                    format!("ollama pull {}", model).cyan()
                ),
                Err(e) => println!("  {} could not check model {}: {}", "✗".red(), model, e),
            }
        }
    } else {
        println!(
            "{} Ollama is not running at {}. Start it with {}.",
            "✗".red(),
            config.ollama.host,
            "ollama serve".cyan()
        );
    }

    Ok(())
}
