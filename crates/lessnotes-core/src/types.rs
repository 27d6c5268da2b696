//! Core domain types for lessnotes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for users (file owners).
pub type UserId = i64;

/// Identifier for tracked files.
pub type FileId = i64;

/// Identifier for conversations.
pub type ConversationId = i64;

/// A tracked file belonging to an owner.
///
/// At most one record exists per `(content_hash, owner_id)` pair.
/// `processed` is true only while the file's current content is fully
/// reflected in the owner's embedding collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: FileId,
    #[serde(rename = "hash")]
    pub content_hash: String,
    pub path: String,
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    pub processed: bool,
}

/// A registered user of the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub school: Option<String>,
    pub major: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The profile fields that drive prompt selection.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            display_name: self.display_name.clone(),
            school: self.school.clone(),
            major: self.major.clone(),
        }
    }
}

/// Optional profile fields; presence selects the prompt variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub school: Option<String>,
    pub major: Option<String>,
}

/// A chat conversation owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A single stored chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: ConversationId,
    pub is_human: bool,
    pub text: String,
}

/// One turn of chat history, ordered by insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub is_human: bool,
    pub text: String,
}

impl ConversationTurn {
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            is_human: true,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            is_human: false,
            text: text.into(),
        }
    }
}

/// A text window headed for the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceChunk {
    pub text: String,
    pub source_path: String,
    /// Extra metadata; the store keeps only flat primitive fields.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl SourceChunk {
    pub fn new(text: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_path: source_path.into(),
            metadata: serde_json::json!({}),
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub content: String,
    pub source: Option<String>,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_record_external_representation() {
        let record = FileRecord {
            id: 3,
            content_hash: "abc123".to_string(),
            path: "/files/7/data/notes.txt".to_string(),
            owner_id: 7,
            processed: true,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["hash"], "abc123");
        assert_eq!(json["userId"], 7);
        assert_eq!(json["path"], "/files/7/data/notes.txt");
        assert_eq!(json["processed"], true);
    }

    #[test]
    fn test_user_profile_extraction() {
        let user = User {
            id: 1,
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            display_name: Some("Ana".to_string()),
            school: None,
            major: None,
            created_at: Utc::now(),
        };

        let profile = user.profile();
        assert_eq!(profile.display_name.as_deref(), Some("Ana"));
        assert!(profile.school.is_none());
    }
}
