//! Initialize lessnotes.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use lessnotes_config::Config;
use lessnotes_db::Database;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    if paths.is_initialized() {
        println!("{} Lessnotes is already initialized.", "Note:".yellow().bold());
        println!("  Config: {}", paths.config_file.display());
        println!("  Database: {}", paths.database_file.display());
        return Ok(());
    }

    println!("{}", "Initializing lessnotes...".cyan().bold());

    paths.ensure_dirs().context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    Config::create_default_file(&paths.config_file).context("Failed to create config file")?;
    println!(
        "  {} Created config: {}",
        "✓".green(),
        paths.config_file.display()
    );

    let _db = Database::open(&paths.database_file).context("Failed to initialize database")?;
    println!(
        "  {} Created database: {}",
        "✓".green(),
        paths.database_file.display()
    );

    println!();
    println!("{}", "Lessnotes initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  1. Register yourself: {}",
        "lessnotes user add <username> <email>".cyan()
    );
    println!(
        "  2. Drop notes into your files directory, then: {}",
        "lessnotes process <user>".cyan()
    );
    println!(
        "  3. Ask away: {}",
        "lessnotes ask --user <id> --conversation <id> \"...\"".cyan()
    );

    Ok(())
}
