//! User management commands.

use super::{get_database, get_paths};
use anyhow::{Context, Result};
use colored::Colorize;
use lessnotes_db::NewUser;

pub fn add(
    username: &str,
    email: &str,
    display_name: Option<String>,
    school: Option<String>,
    major: Option<String>,
) -> Result<()> {
    let paths = get_paths()?;
    let db = get_database()?;

    let user = db
        .create_user(&NewUser {
            username: username.to_string(),
            email: email.to_string(),
            display_name,
            school,
            major,
        })
        .context("Failed to create user")?;

    // Seed the user's note tree alongside the hidden marker directory the
    // processing scan skips.
    let files_dir = paths.user_files_dir(user.id);
    std::fs::create_dir_all(&files_dir).context("Failed to create user files directory")?;
    std::fs::create_dir_all(paths.user_marker_dir(user.id))
        .context("Failed to create user marker directory")?;

    println!(
        "{} Created user {} with id {}",
        "✓".green(),
        user.username.cyan(),
        user.id
    );
    println!("  Drop notes into: {}", files_dir.display());

    Ok(())
}

pub fn show(id: i64) -> Result<()> {
    let db = get_database()?;
    let user = db.get_user(id)?;

    println!("{}", format!("User {}", user.id).cyan().bold());
    println!("{}", "─".repeat(50));
    println!("  Username: {}", user.username);
    println!("  Email: {}", user.email);
    println!("  Name: {}", user.display_name.as_deref().unwrap_or("-"));
    println!("  School: {}", user.school.as_deref().unwrap_or("-"));
    println!("  Major: {}", user.major.as_deref().unwrap_or("-"));
    println!("  Created: {}", user.created_at);

    Ok(())
}
