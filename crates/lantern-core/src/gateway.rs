//! Backend gateway trait.
//!
//! Defines the interface to the chat backend's HTTP API. The application
//! layer only ever talks to this trait, decoupling it from the transport so
//! that organizer and controller logic can be exercised against scripted
//! in-memory implementations.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{BackendStatus, Bucket, Group, GroupId, Message, Session, SessionId};
use crate::ordering::Placement;

/// An abstract gateway to the chat backend.
///
/// All durable state (groups, sessions, messages) lives behind this trait;
/// the client never persists anything itself. Every method is a single HTTP
/// round-trip in the production implementation, and any non-success response
/// surfaces as an error. No method is ever retried automatically.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Lists all groups.
    async fn list_groups(&self) -> Result<Vec<Group>>;

    /// Creates a group with the given name.
    ///
    /// # Returns
    ///
    /// The created group, with its backend-assigned id.
    async fn create_group(&self, name: &str) -> Result<Group>;

    /// Renames a group.
    async fn rename_group(&self, id: GroupId, name: &str) -> Result<Group>;

    /// Deletes a group.
    ///
    /// Sessions under the deleted group are reassigned to uncategorized by
    /// the backend; the client only refreshes afterward.
    async fn delete_group(&self, id: GroupId) -> Result<()>;

    /// Lists all sessions across every bucket.
    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Creates a session with the given title in the given bucket.
    ///
    /// # Returns
    ///
    /// The created session, with its backend-assigned id and order.
    async fn create_session(&self, title: &str, bucket: Bucket) -> Result<Session>;

    /// Renames a session.
    async fn rename_session(&self, id: SessionId, title: &str) -> Result<Session>;

    /// Moves a session to a new bucket and rank.
    async fn move_session(&self, id: SessionId, placement: Placement) -> Result<Session>;

    /// Deletes a session and its message history.
    async fn delete_session(&self, id: SessionId) -> Result<()>;

    /// Lists the full message history of a session, oldest first.
    async fn list_messages(&self, session_id: SessionId) -> Result<Vec<Message>>;

    /// Submits one chat turn and waits for the assistant reply.
    ///
    /// The backend persists the user message before generating, so a turn
    /// abandoned mid-flight may still appear in the session's history on the
    /// next reload.
    async fn send_chat(&self, session_id: SessionId, content: &str) -> Result<Message>;

    /// Queries the backend's health and model state.
    async fn status(&self) -> Result<BackendStatus>;
}
