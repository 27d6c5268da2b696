//! Conversation management commands.

use super::get_database;
use anyhow::{Context, Result};
use colored::Colorize;

pub fn new(user: i64) -> Result<()> {
    let db = get_database()?;
    let conversation = db
        .create_conversation(user)
        .context("Failed to create conversation")?;

    println!(
        "{} Started conversation {} for user {}",
        "✓".green(),
        conversation.id,
        user
    );
    println!(
        "  Ask with: {}",
        format!(
            "lessnotes ask --user {} --conversation {} \"...\"",
            user, conversation.id
        )
        .cyan()
    );

    Ok(())
}
