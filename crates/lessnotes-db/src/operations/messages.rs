//! Conversation and message operations.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use lessnotes_core::{Conversation, ConversationId, ConversationTurn, Message, UserId};
use rusqlite::params;

impl Database {
    /// Create a conversation for a user.
    pub fn create_conversation(&self, user_id: UserId) -> DbResult<Conversation> {
        // Reject unknown owners up front rather than relying on the
        // foreign-key error message.
        self.get_user(user_id)?;

        let conn = self.conn()?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO conversations (user_id, created_at) VALUES (?1, ?2)",
            params![user_id, created_at.to_rfc3339()],
        )?;

        Ok(Conversation {
            id: conn.last_insert_rowid(),
            user_id,
            created_at,
        })
    }

    /// Get a conversation by id.
    pub fn get_conversation(&self, id: ConversationId) -> DbResult<Conversation> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, user_id, created_at FROM conversations WHERE id = ?1",
            params![id],
            |row| {
                let created_at_str: String = row.get(2)?;
                Ok(Conversation {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    created_at: DateTime::parse_from_rfc3339(&created_at_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                })
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                DbError::NotFound(format!("Conversation not found: {}", id))
            }
            _ => DbError::from(e),
        })
    }

    /// Append a message to a conversation.
    pub fn create_message(
        &self,
        conversation_id: ConversationId,
        is_human: bool,
        text: &str,
    ) -> DbResult<Message> {
        self.get_conversation(conversation_id)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO messages (conversation_id, is_human, text) VALUES (?1, ?2, ?3)",
            params![conversation_id, is_human, text],
        )?;

        Ok(Message {
            id: conn.last_insert_rowid(),
            conversation_id,
            is_human,
            text: text.to_string(),
        })
    }

    /// A conversation's turns in insertion order.
    pub fn list_turns(&self, conversation_id: ConversationId) -> DbResult<Vec<ConversationTurn>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT is_human, text FROM messages
             WHERE conversation_id = ?1 ORDER BY id",
        )?;

        let turns = stmt.query_map(params![conversation_id], |row| {
            Ok(ConversationTurn {
                is_human: row.get(0)?,
                text: row.get(1)?,
            })
        })?;

        turns.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }
}
