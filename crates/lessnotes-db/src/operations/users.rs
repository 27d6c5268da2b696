//! User directory operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use lessnotes_core::{User, UserId, UserProfile};
use rusqlite::params;

/// Fields for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub school: Option<String>,
    pub major: Option<String>,
}

impl Database {
    /// Create a new user. Duplicate usernames or emails surface as
    /// `DbError::Conflict`.
    pub fn create_user(&self, new_user: &NewUser) -> DbResult<User> {
        let conn = self.conn()?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO users (username, email, display_name, school, major, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new_user.username,
                new_user.email,
                new_user.display_name,
                new_user.school,
                new_user.major,
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            display_name: new_user.display_name.clone(),
            school: new_user.school.clone(),
            major: new_user.major.clone(),
            created_at,
        })
    }

    /// Get a user by id.
    pub fn get_user(&self, id: UserId) -> DbResult<User> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, username, email, display_name, school, major, created_at
             FROM users WHERE id = ?1",
            params![id],
            row_to_user,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("User not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// Get a user's prompt-selection profile.
    pub fn get_user_profile(&self, id: UserId) -> DbResult<UserProfile> {
        Ok(self.get_user(id)?.profile())
    }
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let created_at_str: String = row.get(6)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        display_name: row.get(3)?,
        school: row.get(4)?,
        major: row.get(5)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
