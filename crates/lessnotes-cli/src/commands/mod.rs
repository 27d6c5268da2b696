//! CLI command implementations.

pub mod ask;
pub mod config;
pub mod conversation;
pub mod files;
pub mod init;
pub mod process;
pub mod status;
pub mod user;

use anyhow::{Context, Result};
use lessnotes_config::AppPaths;
use lessnotes_db::Database;

/// Get the application paths.
pub fn get_paths() -> Result<AppPaths> {
    AppPaths::new().context("Failed to determine application directories")
}

/// Get a database connection, ensuring lessnotes is initialized.
pub fn get_database() -> Result<Database> {
    let paths = get_paths()?;

    if !paths.is_initialized() {
        anyhow::bail!("Lessnotes is not initialized. Run 'lessnotes init' first.");
    }

    Database::open(&paths.database_file).context("Failed to open database")
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> Result<String> {
    if path.starts_with('~') {
        let home = std::env::var("HOME").context("HOME not set")?;
        Ok(path.replacen('~', &home, 1))
    } else {
        Ok(path.to_string())
    }
}
