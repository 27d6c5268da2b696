//! Files command - list a user's tracked files.

use super::get_database;
use anyhow::{Context, Result};

pub fn run(user: i64) -> Result<()> {
    let db = get_database()?;

    // Surface unknown users as an error rather than an empty list.
    db.get_user(user)?;

    let records = db.list_files_by_owner(user)?;
    let json =
        serde_json::to_string_pretty(&records).context("Failed to serialize file records")?;
    println!("{}", json);

    Ok(())
}
