//! Process command - reconcile and index a user's notes.

use super::{expand_home, get_database, get_paths};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lessnotes_config::Config;
use lessnotes_db::SqliteVectorStore;
use lessnotes_ingest::{Chunker, FileRegistry, HashAlgorithm, IngestPipeline};
use lessnotes_ollama::OllamaClient;
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;

pub fn run(user: i64, path: Option<String>) -> Result<()> {
    let paths = get_paths()?;
    let db = get_database()?;
    let config = Config::load().context("Failed to load configuration")?;

    // Unknown users are rejected before any file work.
    db.get_user(user)?;

    let root: PathBuf = match path {
        Some(p) => PathBuf::from(expand_home(&p)?),
        None => paths.user_files_dir(user),
    };

    let client =
        OllamaClient::from_config(&config.ollama).context("Failed to create Ollama client")?;

    let rt = Runtime::new().context("Failed to create async runtime")?;

    if !rt.block_on(client.is_available()) {
        anyhow::bail!(
            "Ollama is not running at {}. Start it with 'ollama serve'.",
            config.ollama.host
        );
    }

    let algorithm = HashAlgorithm::parse(&config.files.hash_algorithm)?;
    let registry = FileRegistry::new(db.clone(), algorithm);
    let store = SqliteVectorStore::new(db, client);
    let chunker = Chunker::new(config.chunking.clone());
    let pipeline = IngestPipeline::new(registry, store, chunker, &config.files.ignore_patterns)?;

    println!(
        "{} {}",
        "Processing:".cyan().bold(),
        root.display()
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Reconciling and indexing...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let report = rt
        .block_on(pipeline.process_owner(user, &root))
        .context("Processing pass failed")?;

    spinner.finish_and_clear();

    println!(
        "  {} {} discovered, {} indexed, {} removed, {} failed",
        "✓".green(),
        report.discovered,
        report.indexed,
        report.removed,
        report.failed
    );
    if report.failed > 0 {
        println!(
            "  {} {} file(s) failed; run the command again to retry them",
            "!".yellow(),
            report.failed
        );
    }

    println!("{}", serde_json::json!({ "message": "files processed" }));

    Ok(())
}
