//! Domain model for the chat client.
//!
//! All durable entities (groups, sessions, messages) are owned by the
//! backend; the client holds read-mostly caches of them. Identifiers are
//! assigned by the backend and echoed back, never fabricated locally.

use serde::{Deserialize, Serialize};

/// Backend-assigned group identifier.
pub type GroupId = i64;

/// Backend-assigned session identifier.
pub type SessionId = i64;

/// A named container for sessions.
///
/// Sessions not assigned to any group belong to the implicit uncategorized
/// bucket, which is not a `Group` entity: it is never listed, renamed, or
/// deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Display rank among groups, when the backend provides one
    #[serde(default)]
    pub order: Option<i64>,
}

/// A single conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Human-readable session title
    pub title: String,
    /// Owning group, `None` for uncategorized
    #[serde(default)]
    pub group_id: Option<GroupId>,
    /// Ordering key within the owning bucket; ties are broken by id
    #[serde(default)]
    pub order: i64,
    /// Backend creation timestamp (ISO 8601), opaque to the client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Session {
    /// The bucket this session currently belongs to.
    pub fn bucket(&self) -> Bucket {
        Bucket::from_group_id(self.group_id)
    }
}

/// A group or the implicit uncategorized partition that sessions belong to.
///
/// The nullable `group_id` exists only at the wire boundary; everywhere group
/// identity is reasoned about, this tagged variant is used instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Bucket {
    Group(GroupId),
    Uncategorized,
}

impl Bucket {
    /// Converts a wire-level nullable group id into a bucket.
    pub fn from_group_id(group_id: Option<GroupId>) -> Self {
        match group_id {
            Some(id) => Bucket::Group(id),
            None => Bucket::Uncategorized,
        }
    }

    /// Converts back to the wire-level nullable group id.
    pub fn group_id(self) -> Option<GroupId> {
        match self {
            Bucket::Group(id) => Some(id),
            Bucket::Uncategorized => None,
        }
    }
}

/// Author of a message.
///
/// The backend schema reserves a `system` role; the client renders it but
/// never emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// One entry in a session's conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Health report from the backend's status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendStatus {
    pub status: String,
    pub model_loaded: bool,
    /// Inference device reported by the backend ("cuda" or "cpu")
    pub device: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_round_trip() {
        assert_eq!(Bucket::from_group_id(Some(3)), Bucket::Group(3));
        assert_eq!(Bucket::from_group_id(None), Bucket::Uncategorized);
        assert_eq!(Bucket::Group(3).group_id(), Some(3));
        assert_eq!(Bucket::Uncategorized.group_id(), None);
    }

    #[test]
    fn test_message_role_wire_format() {
        let msg: Message = serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(msg.role, MessageRole::Assistant);

        let json = serde_json::to_string(&Message::user("hello")).unwrap();
        assert!(json.contains(r#""role":"user""#));
    }

    #[test]
    fn test_session_defaults_for_missing_fields() {
        // Older backends omit group_id and order entirely
        let session: Session = serde_json::from_str(r#"{"id":1,"title":"New Chat"}"#).unwrap();
        assert_eq!(session.group_id, None);
        assert_eq!(session.order, 0);
        assert_eq!(session.bucket(), Bucket::Uncategorized);
    }
}
