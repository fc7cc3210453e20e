//! Session/group organizer.
//!
//! Holds the client-side mirror of the backend's groups and sessions plus
//! the transient view state of the sidebar: the single active rename edit,
//! per-group collapse flags, and the current drag hover. Every mutation goes
//! through the gateway and is followed by a full refresh; the cache is never
//! edited speculatively.

use std::collections::HashSet;
use std::sync::Arc;

use lantern_core::error::{LanternError, Result};
use lantern_core::gateway::ChatGateway;
use lantern_core::model::{Bucket, Group, GroupId, Session, SessionId};
use lantern_core::ordering::{self, DropPosition};
use lantern_core::platform::ConfirmPrompt;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

const DEFAULT_SESSION_TITLE: &str = "New Chat";
const DEFAULT_GROUP_NAME: &str = "New Group";

const DELETE_SESSION_PROMPT: &str = "Delete this chat and its entire history?";
const DELETE_GROUP_PROMPT: &str =
    "Delete this group? Its chats will be moved to Uncategorized.";

/// The item a rename edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum EditTarget {
    Session(SessionId),
    Group(GroupId),
}

/// An in-progress rename: the edited item and its pending text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditState {
    pub target: EditTarget,
    pub text: String,
}

/// The row or header currently hovered while dragging a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "target", rename_all = "snake_case")]
pub enum DragTarget {
    Session(SessionId),
    Header(Bucket),
}

/// Drag hover feedback, recomputed on every pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragHover {
    pub target: DragTarget,
    pub position: DropPosition,
}

/// Presentation-facing view of the organizer.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizerSnapshot {
    pub groups: Vec<Group>,
    pub sessions: Vec<Session>,
    pub edit: Option<EditState>,
    pub collapsed_groups: Vec<GroupId>,
    pub drag: Option<DragHover>,
}

#[derive(Default)]
struct OrganizerState {
    groups: Vec<Group>,
    sessions: Vec<Session>,
    edit: Option<EditState>,
    collapsed: HashSet<GroupId>,
    drag: Option<DragHover>,
}

impl OrganizerState {
    /// Drops transient state that points at entities no longer in the cache.
    fn prune_transient(&mut self) {
        let edit_alive = match self.edit.as_ref().map(|e| e.target) {
            Some(EditTarget::Session(id)) => self.sessions.iter().any(|s| s.id == id),
            Some(EditTarget::Group(id)) => self.groups.iter().any(|g| g.id == id),
            None => true,
        };
        if !edit_alive {
            self.edit = None;
        }

        let groups = &self.groups;
        self.collapsed
            .retain(|id| groups.iter().any(|g| g.id == *id));
    }
}

/// Owns the group/session hierarchy and its transient UI state.
///
/// One organizer is owned by exactly one presentation context; there is no
/// cross-instance sharing. All durable state lives behind the gateway.
pub struct Organizer {
    gateway: Arc<dyn ChatGateway>,
    prompt: Arc<dyn ConfirmPrompt>,
    state: RwLock<OrganizerState>,
}

impl Organizer {
    /// Creates an organizer with an empty cache.
    ///
    /// Call [`refresh`](Self::refresh) before first render.
    pub fn new(gateway: Arc<dyn ChatGateway>, prompt: Arc<dyn ConfirmPrompt>) -> Self {
        Self {
            gateway,
            prompt,
            state: RwLock::new(OrganizerState::default()),
        }
    }

    /// Refetches groups and sessions and replaces the cache atomically.
    ///
    /// The two fetches run concurrently and must both succeed before either
    /// cache field is touched; on failure the prior cache is retained and
    /// the error propagates.
    pub async fn refresh(&self) -> Result<()> {
        let (groups, sessions) = tokio::try_join!(
            self.gateway.list_groups(),
            self.gateway.list_sessions()
        )?;

        let mut state = self.state.write().await;
        state.groups = groups;
        state.sessions = sessions;
        state.prune_transient();
        Ok(())
    }

    /// Returns a copy of the cached sessions, in backend list order.
    pub async fn sessions(&self) -> Vec<Session> {
        self.state.read().await.sessions.clone()
    }

    /// Returns a copy of the cached groups.
    pub async fn groups(&self) -> Vec<Group> {
        self.state.read().await.groups.clone()
    }

    /// The cached sessions of one bucket, in display order.
    ///
    /// Display order is the stable `(order, id)` sort, so colliding orders
    /// left behind by the simplified drop placement resolve consistently.
    pub async fn bucket_sessions(&self, bucket: Bucket) -> Vec<Session> {
        let state = self.state.read().await;
        ordering::bucket_sessions(&state.sessions, bucket)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Creates a session in the given bucket and refreshes.
    ///
    /// # Returns
    ///
    /// The created session, with its backend-assigned id.
    pub async fn create_session(&self, bucket: Bucket) -> Result<Session> {
        let created = self
            .gateway
            .create_session(DEFAULT_SESSION_TITLE, bucket)
            .await?;
        debug!(session_id = created.id, "session created");
        self.refresh().await?;
        Ok(created)
    }

    /// Creates a group and refreshes.
    pub async fn create_group(&self, name: Option<&str>) -> Result<Group> {
        let created = self
            .gateway
            .create_group(name.unwrap_or(DEFAULT_GROUP_NAME))
            .await?;
        debug!(group_id = created.id, "group created");
        self.refresh().await?;
        Ok(created)
    }

    /// Renames a session.
    ///
    /// A trimmed new title that is empty or equal to the current title is a
    /// no-op: no gateway call is made.
    pub async fn rename_session(&self, id: SessionId, title: &str) -> Result<()> {
        let title = title.trim();
        let current = {
            let state = self.state.read().await;
            state
                .sessions
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.title.clone())
        }
        .ok_or_else(|| LanternError::not_found("session", id))?;

        if title.is_empty() || title == current {
            debug!(session_id = id, "rename skipped");
            return Ok(());
        }

        self.gateway.rename_session(id, title).await?;
        self.refresh().await
    }

    /// Renames a group, with the same no-op rule as session renames.
    pub async fn rename_group(&self, id: GroupId, name: &str) -> Result<()> {
        let name = name.trim();
        let current = {
            let state = self.state.read().await;
            state.groups.iter().find(|g| g.id == id).map(|g| g.name.clone())
        }
        .ok_or_else(|| LanternError::not_found("group", id))?;

        if name.is_empty() || name == current {
            debug!(group_id = id, "rename skipped");
            return Ok(());
        }

        self.gateway.rename_group(id, name).await?;
        self.refresh().await
    }

    /// Deletes a session after user confirmation.
    ///
    /// # Returns
    ///
    /// `true` if the session was deleted, `false` if the user declined (no
    /// gateway call, no state change).
    pub async fn delete_session(&self, id: SessionId) -> Result<bool> {
        if !self.prompt.confirm(DELETE_SESSION_PROMPT).await {
            return Ok(false);
        }

        self.gateway.delete_session(id).await?;
        debug!(session_id = id, "session deleted");
        self.refresh().await?;
        Ok(true)
    }

    /// Deletes a group after user confirmation.
    ///
    /// The backend reassigns the group's sessions to uncategorized; the
    /// client only refreshes afterward.
    pub async fn delete_group(&self, id: GroupId) -> Result<bool> {
        if !self.prompt.confirm(DELETE_GROUP_PROMPT).await {
            return Ok(false);
        }

        self.gateway.delete_group(id).await?;
        debug!(group_id = id, "group deleted");
        self.refresh().await?;
        Ok(true)
    }

    /// Moves a session per the drop description and refreshes.
    pub async fn move_session(
        &self,
        dragged_id: SessionId,
        target_bucket: Bucket,
        target_session_id: Option<SessionId>,
        position: DropPosition,
    ) -> Result<()> {
        let placement = {
            let state = self.state.read().await;
            ordering::plan_move(
                &state.sessions,
                dragged_id,
                target_bucket,
                target_session_id,
                position,
            )?
        };

        self.gateway.move_session(dragged_id, placement).await?;
        debug!(session_id = dragged_id, ?placement, "session moved");

        self.state.write().await.drag = None;
        self.refresh().await
    }

    /// Starts a rename edit on an item, seeded with its current text.
    ///
    /// Only one item may be in edit mode at a time; starting an edit on a
    /// new item implicitly ends the previous one.
    pub async fn begin_edit(&self, target: EditTarget) -> Result<()> {
        let mut state = self.state.write().await;
        let text = match target {
            EditTarget::Session(id) => state
                .sessions
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.title.clone())
                .ok_or_else(|| LanternError::not_found("session", id))?,
            EditTarget::Group(id) => state
                .groups
                .iter()
                .find(|g| g.id == id)
                .map(|g| g.name.clone())
                .ok_or_else(|| LanternError::not_found("group", id))?,
        };
        state.edit = Some(EditState { target, text });
        Ok(())
    }

    /// Replaces the pending text of the active edit, if any.
    pub async fn set_edit_text(&self, text: impl Into<String>) {
        if let Some(edit) = self.state.write().await.edit.as_mut() {
            edit.text = text.into();
        }
    }

    /// Commits the active edit, dispatching the rename.
    ///
    /// A commit with no active edit is a no-op. The no-op rename rule still
    /// applies, so committing an unchanged or blank text makes no gateway
    /// call.
    pub async fn commit_edit(&self) -> Result<()> {
        let edit = self.state.write().await.edit.take();
        let Some(edit) = edit else {
            return Ok(());
        };

        match edit.target {
            EditTarget::Session(id) => self.rename_session(id, &edit.text).await,
            EditTarget::Group(id) => self.rename_group(id, &edit.text).await,
        }
    }

    /// Discards the active edit without calling the gateway.
    pub async fn cancel_edit(&self) {
        self.state.write().await.edit = None;
    }

    /// Toggles a group between collapsed and expanded.
    ///
    /// Collapse state is purely local and defaults to expanded.
    pub async fn toggle_group(&self, id: GroupId) {
        let mut state = self.state.write().await;
        if !state.collapsed.remove(&id) {
            state.collapsed.insert(id);
        }
    }

    /// Records the current drag hover for visual feedback.
    pub async fn drag_over(&self, target: DragTarget, position: DropPosition) {
        self.state.write().await.drag = Some(DragHover { target, position });
    }

    /// Clears drag hover feedback (drag ended or left the list).
    pub async fn clear_drag(&self) {
        self.state.write().await.drag = None;
    }

    /// Builds the presentation-facing snapshot of the organizer.
    pub async fn snapshot(&self) -> OrganizerSnapshot {
        let state = self.state.read().await;
        let mut collapsed: Vec<GroupId> = state.collapsed.iter().copied().collect();
        collapsed.sort_unstable();

        OrganizerSnapshot {
            groups: state.groups.clone(),
            sessions: state.sessions.clone(),
            edit: state.edit.clone(),
            collapsed_groups: collapsed,
            drag: state.drag,
        }
    }
}
