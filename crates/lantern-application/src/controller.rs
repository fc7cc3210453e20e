//! Conversation controller.
//!
//! Owns the active session id, the visible message list, the input draft,
//! and the lifecycle of one chat turn: `Idle -> Sending -> {Completed |
//! Cancelled | Failed} -> Idle`. At most one turn is in flight per
//! controller; concurrent sends are rejected at the call site, not queued.

use std::sync::Arc;

use lantern_core::error::{LanternError, Result};
use lantern_core::gateway::ChatGateway;
use lantern_core::model::{Message, SessionId};
use lantern_core::platform::Clipboard;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Shown in place of a reply when the backend cannot be reached.
const SEND_FAILURE_NOTICE: &str = "Error: unable to reach the model backend.";

/// How a chat turn ended.
///
/// Cancellation is a normal outcome, not an error: the optimistic user
/// message stays in the list and only the pending reply is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    Completed,
    Cancelled,
    Failed,
}

/// Presentation-facing view of the conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSnapshot {
    pub active_session_id: Option<SessionId>,
    pub messages: Vec<Message>,
    pub sending: bool,
    pub draft: String,
    pub reply_context: Option<String>,
}

/// The turn currently in flight: its origin session and cancel handle.
struct TurnHandle {
    session_id: SessionId,
    token: CancellationToken,
}

#[derive(Default)]
struct ControllerState {
    active_session_id: Option<SessionId>,
    messages: Vec<Message>,
    draft: String,
    reply_context: Option<String>,
    sending: Option<TurnHandle>,
}

enum TurnResolution {
    Completed(Message),
    Cancelled,
    Failed(LanternError),
}

/// Manages the active session's message list and the chat-turn lifecycle.
pub struct ConversationController {
    gateway: Arc<dyn ChatGateway>,
    clipboard: Arc<dyn Clipboard>,
    state: RwLock<ControllerState>,
}

impl ConversationController {
    pub fn new(gateway: Arc<dyn ChatGateway>, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            gateway,
            clipboard,
            state: RwLock::new(ControllerState::default()),
        }
    }

    /// The session whose messages are currently shown, if any.
    ///
    /// `None` only during the bootstrap window before the first session is
    /// created or loaded.
    pub async fn active_session_id(&self) -> Option<SessionId> {
        self.state.read().await.active_session_id
    }

    /// Whether a chat turn is in flight (send affordance disabled).
    pub async fn is_sending(&self) -> bool {
        self.state.read().await.sending.is_some()
    }

    /// Replaces the input draft (mirrored from the input field).
    pub async fn set_draft(&self, text: impl Into<String>) {
        self.state.write().await.draft = text.into();
    }

    /// Sets the pending quoted-reply context.
    pub async fn set_reply_context(&self, content: impl Into<String>) {
        self.state.write().await.reply_context = Some(content.into());
    }

    /// Clears the pending quoted-reply context.
    pub async fn clear_reply_context(&self) {
        self.state.write().await.reply_context = None;
    }

    /// Switches to a session and reloads its full message history.
    ///
    /// The active id and an empty list are applied before the fetch, so the
    /// controller never points at a session that no longer exists; if the
    /// history fetch fails the list simply stays empty and the error
    /// propagates.
    pub async fn activate_session(&self, id: SessionId) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.active_session_id = Some(id);
            state.messages.clear();
        }

        let messages = self.gateway.list_messages(id).await?;

        let mut state = self.state.write().await;
        // Only apply if the user did not switch again mid-fetch
        if state.active_session_id == Some(id) {
            state.messages = messages;
        }
        Ok(())
    }

    /// Activates a freshly created session without a history fetch.
    pub async fn activate_new(&self, id: SessionId) {
        let mut state = self.state.write().await;
        state.active_session_id = Some(id);
        state.messages.clear();
    }

    /// Submits the current draft as one chat turn.
    ///
    /// Rejected synchronously, with no gateway call, when the trimmed draft
    /// is empty or a turn is already in flight. Otherwise the user message
    /// is appended optimistically before any network activity, a fresh
    /// cancellation token is armed, and the call resolves with the turn's
    /// outcome once the backend replies, the turn is cancelled, or the
    /// transport fails.
    pub async fn send(&self) -> Result<TurnOutcome> {
        let (session_id, content, token) = {
            let mut state = self.state.write().await;

            if state.sending.is_some() {
                return Err(LanternError::TurnInFlight);
            }
            let session_id = state
                .active_session_id
                .ok_or_else(|| LanternError::not_found("session", "active"))?;
            let trimmed = state.draft.trim().to_string();
            if trimmed.is_empty() {
                return Err(LanternError::EmptyInput);
            }

            let content = match state.reply_context.take() {
                Some(context) => format!("{}\n\n{}", quoted(&context), trimmed),
                None => trimmed,
            };

            state.draft.clear();
            state.messages.push(Message::user(content.clone()));

            let token = CancellationToken::new();
            // A live handle here would mean the single-flight guard was
            // bypassed; retire its token before replacing it
            if let Some(previous) = state.sending.replace(TurnHandle {
                session_id,
                token: token.clone(),
            }) {
                previous.token.cancel();
            }

            (session_id, content, token)
        };

        debug!(session_id, "chat turn started");

        let resolution = tokio::select! {
            _ = token.cancelled() => TurnResolution::Cancelled,
            result = self.gateway.send_chat(session_id, &content) => match result {
                Ok(reply) => TurnResolution::Completed(reply),
                Err(err) => TurnResolution::Failed(err),
            },
        };

        let mut state = self.state.write().await;
        state.sending = None;

        // The turn is tagged with its origin; a reply landing after the
        // user switched sessions is dropped rather than appended to the
        // wrong list.
        let stale = state.active_session_id != Some(session_id);

        match resolution {
            TurnResolution::Completed(reply) => {
                if stale {
                    debug!(session_id, "discarding reply for inactive session");
                } else {
                    state.messages.push(reply);
                }
                Ok(TurnOutcome::Completed)
            }
            TurnResolution::Cancelled => {
                debug!(session_id, "chat turn cancelled");
                if !stale {
                    state.draft = content;
                }
                Ok(TurnOutcome::Cancelled)
            }
            TurnResolution::Failed(err) => {
                warn!(session_id, error = %err, "chat turn failed");
                if stale {
                    debug!(session_id, "discarding failure notice for inactive session");
                } else {
                    state.messages.push(Message::assistant(SEND_FAILURE_NOTICE));
                }
                Ok(TurnOutcome::Failed)
            }
        }
    }

    /// Aborts the in-flight turn, if any.
    ///
    /// A no-op once the turn has resolved: the token is retired together
    /// with the turn handle.
    pub async fn cancel(&self) {
        let turn = {
            let state = self.state.read().await;
            state
                .sending
                .as_ref()
                .map(|turn| (turn.session_id, turn.token.clone()))
        };
        if let Some((session_id, token)) = turn {
            debug!(session_id, "cancelling chat turn");
            token.cancel();
        }
    }

    /// Copies a message's content to the clipboard.
    ///
    /// Side effect only; no state transition.
    pub async fn copy_message(&self, content: &str) -> Result<()> {
        self.clipboard.write_text(content)
    }

    /// Builds the presentation-facing snapshot of the conversation.
    pub async fn snapshot(&self) -> ConversationSnapshot {
        let state = self.state.read().await;
        ConversationSnapshot {
            active_session_id: state.active_session_id,
            messages: state.messages.clone(),
            sending: state.sending.is_some(),
            draft: state.draft.clone(),
            reply_context: state.reply_context.clone(),
        }
    }
}

/// Prefixes every line of a reply context in quote style.
fn quoted(context: &str) -> String {
    context
        .lines()
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
