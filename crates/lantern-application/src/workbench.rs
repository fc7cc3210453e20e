//! Chat workbench use case.
//!
//! Coordinates the [`Organizer`] and the [`ConversationController`] so the
//! two stay consistent: deleting the active session falls back to another
//! one, creating a chat activates it, and the combined snapshot is what the
//! presentation shell renders. One workbench instance is owned by exactly
//! one presentation context and is the only mutator of its state.

use std::sync::Arc;

use lantern_core::error::Result;
use lantern_core::gateway::ChatGateway;
use lantern_core::model::{BackendStatus, Bucket, Group, GroupId, Message, Session, SessionId};
use lantern_core::ordering::DropPosition;
use lantern_core::platform::{Clipboard, ConfirmPrompt};
use serde::Serialize;
use tracing::debug;

use crate::controller::{ConversationController, TurnOutcome};
use crate::organizer::{DragHover, DragTarget, EditState, EditTarget, Organizer};

/// Everything the presentation layer needs to render one frame.
#[derive(Debug, Clone, Serialize)]
pub struct WorkbenchSnapshot {
    pub groups: Vec<Group>,
    pub sessions: Vec<Session>,
    pub active_session_id: Option<SessionId>,
    pub messages: Vec<Message>,
    pub sending: bool,
    pub draft: String,
    pub reply_context: Option<String>,
    pub edit: Option<EditState>,
    pub collapsed_groups: Vec<GroupId>,
    pub drag: Option<DragHover>,
}

/// The client core: organizer plus conversation controller behind one
/// intent surface.
pub struct ChatWorkbench {
    gateway: Arc<dyn ChatGateway>,
    organizer: Organizer,
    controller: ConversationController,
}

impl ChatWorkbench {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        prompt: Arc<dyn ConfirmPrompt>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            organizer: Organizer::new(gateway.clone(), prompt),
            controller: ConversationController::new(gateway.clone(), clipboard),
            gateway,
        }
    }

    /// Loads the initial state: refreshes the hierarchy, then activates the
    /// first listed session, or creates and activates a fresh one when the
    /// backend has none.
    pub async fn bootstrap(&self) -> Result<()> {
        self.organizer.refresh().await?;

        let sessions = self.organizer.sessions().await;
        match sessions.first() {
            Some(first) => self.controller.activate_session(first.id).await,
            None => {
                let created = self.organizer.create_session(Bucket::Uncategorized).await?;
                self.controller.activate_new(created.id).await;
                Ok(())
            }
        }
    }

    /// Switches the conversation view to another session.
    pub async fn activate_session(&self, id: SessionId) -> Result<()> {
        self.controller.activate_session(id).await
    }

    /// Creates a session in the given bucket and makes it active.
    pub async fn create_session(&self, bucket: Bucket) -> Result<Session> {
        let created = self.organizer.create_session(bucket).await?;
        self.controller.activate_new(created.id).await;
        Ok(created)
    }

    /// Creates a group (default name when `None`).
    pub async fn create_group(&self, name: Option<&str>) -> Result<Group> {
        self.organizer.create_group(name).await
    }

    /// Renames a session; unchanged or blank titles are a no-op.
    pub async fn rename_session(&self, id: SessionId, title: &str) -> Result<()> {
        self.organizer.rename_session(id, title).await
    }

    /// Renames a group; unchanged or blank names are a no-op.
    pub async fn rename_group(&self, id: GroupId, name: &str) -> Result<()> {
        self.organizer.rename_group(id, name).await
    }

    /// Deletes a session after confirmation, keeping the conversation view
    /// on a live session.
    ///
    /// When the deleted session was active: the first remaining session (in
    /// list order after the refresh) becomes active, or a fresh session is
    /// created and activated when none remain. The controller therefore
    /// never holds an active id without a backing session.
    pub async fn delete_session(&self, id: SessionId) -> Result<()> {
        let was_active = self.controller.active_session_id().await == Some(id);

        if !self.organizer.delete_session(id).await? || !was_active {
            return Ok(());
        }

        let sessions = self.organizer.sessions().await;
        match sessions.first() {
            Some(next) => {
                debug!(session_id = next.id, "activating fallback session");
                self.controller.activate_session(next.id).await
            }
            None => {
                let created = self.organizer.create_session(Bucket::Uncategorized).await?;
                debug!(session_id = created.id, "activating replacement session");
                self.controller.activate_new(created.id).await;
                Ok(())
            }
        }
    }

    /// Deletes a group after confirmation; its sessions move to
    /// uncategorized on the backend.
    pub async fn delete_group(&self, id: GroupId) -> Result<()> {
        self.organizer.delete_group(id).await?;
        Ok(())
    }

    /// Applies a completed drag-and-drop of a session.
    pub async fn move_session(
        &self,
        dragged_id: SessionId,
        target_bucket: Bucket,
        target_session_id: Option<SessionId>,
        position: DropPosition,
    ) -> Result<()> {
        self.organizer
            .move_session(dragged_id, target_bucket, target_session_id, position)
            .await
    }

    /// Starts a rename edit, ending any previous one.
    pub async fn begin_edit(&self, target: EditTarget) -> Result<()> {
        self.organizer.begin_edit(target).await
    }

    /// Mirrors the rename input field into the pending edit.
    pub async fn set_edit_text(&self, text: impl Into<String>) {
        self.organizer.set_edit_text(text).await
    }

    /// Commits the pending rename edit.
    pub async fn commit_edit(&self) -> Result<()> {
        self.organizer.commit_edit().await
    }

    /// Discards the pending rename edit.
    pub async fn cancel_edit(&self) {
        self.organizer.cancel_edit().await
    }

    /// Toggles a group's collapsed state.
    pub async fn toggle_group(&self, id: GroupId) {
        self.organizer.toggle_group(id).await
    }

    /// Records drag hover feedback while a session is being dragged.
    pub async fn drag_over(&self, target: DragTarget, position: DropPosition) {
        self.organizer.drag_over(target, position).await
    }

    /// Clears drag hover feedback.
    pub async fn clear_drag(&self) {
        self.organizer.clear_drag().await
    }

    /// Mirrors the chat input field into the controller.
    pub async fn set_draft(&self, text: impl Into<String>) {
        self.controller.set_draft(text).await
    }

    /// Submits the current draft as a chat turn.
    pub async fn send(&self) -> Result<TurnOutcome> {
        self.controller.send().await
    }

    /// Aborts the in-flight chat turn, if any.
    pub async fn cancel_turn(&self) {
        self.controller.cancel().await
    }

    /// Sets the quoted-reply context for the next send.
    pub async fn set_reply_context(&self, content: impl Into<String>) {
        self.controller.set_reply_context(content).await
    }

    /// Clears the quoted-reply context.
    pub async fn clear_reply_context(&self) {
        self.controller.clear_reply_context().await
    }

    /// Copies a message's content to the clipboard.
    pub async fn copy_message(&self, content: &str) -> Result<()> {
        self.controller.copy_message(content).await
    }

    /// The sessions of one bucket, in display order, for rendering that
    /// bucket's rows.
    pub async fn bucket_sessions(&self, bucket: Bucket) -> Vec<Session> {
        self.organizer.bucket_sessions(bucket).await
    }

    /// Queries the backend's health and model state.
    pub async fn backend_status(&self) -> Result<BackendStatus> {
        self.gateway.status().await
    }

    /// Builds the combined snapshot for rendering.
    pub async fn snapshot(&self) -> WorkbenchSnapshot {
        let organizer = self.organizer.snapshot().await;
        let conversation = self.controller.snapshot().await;

        WorkbenchSnapshot {
            groups: organizer.groups,
            sessions: organizer.sessions,
            active_session_id: conversation.active_session_id,
            messages: conversation.messages,
            sending: conversation.sending,
            draft: conversation.draft,
            reply_context: conversation.reply_context,
            edit: organizer.edit,
            collapsed_groups: organizer.collapsed_groups,
            drag: organizer.drag,
        }
    }
}
