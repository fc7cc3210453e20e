//! Shared fakes for the application-layer tests.
//!
//! `RecordingGateway` is a small in-memory stand-in for the backend: it
//! honors the gateway contract (ids assigned on create, group deletion
//! reassigns sessions to uncategorized), records every call, and exposes
//! switches for injecting failures and for holding a chat turn open until
//! the test releases it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lantern_core::error::{LanternError, Result};
use lantern_core::gateway::ChatGateway;
use lantern_core::model::{BackendStatus, Bucket, Group, GroupId, Message, Session, SessionId};
use lantern_core::ordering::Placement;
use lantern_core::platform::{Clipboard, ConfirmPrompt};
use tokio::sync::Notify;

pub struct RecordingGateway {
    calls: Mutex<Vec<&'static str>>,
    groups: Mutex<Vec<Group>>,
    sessions: Mutex<Vec<Session>>,
    messages: Mutex<HashMap<SessionId, Vec<Message>>>,
    session_renames: Mutex<Vec<(SessionId, String)>>,
    moves: Mutex<Vec<(SessionId, Option<GroupId>, i64)>>,
    chat_requests: Mutex<Vec<(SessionId, String)>>,
    chat_reply: Mutex<String>,
    chat_gate: Mutex<Option<Arc<Notify>>>,
    fail_sessions_fetch: AtomicBool,
    fail_chat: AtomicBool,
    next_id: AtomicI64,
}

impl RecordingGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            groups: Mutex::new(Vec::new()),
            sessions: Mutex::new(Vec::new()),
            messages: Mutex::new(HashMap::new()),
            session_renames: Mutex::new(Vec::new()),
            moves: Mutex::new(Vec::new()),
            chat_requests: Mutex::new(Vec::new()),
            chat_reply: Mutex::new("(reply)".to_string()),
            chat_gate: Mutex::new(None),
            fail_sessions_fetch: AtomicBool::new(false),
            fail_chat: AtomicBool::new(false),
            // Seeded ids stay below the allocator range
            next_id: AtomicI64::new(1000),
        })
    }

    pub fn seed_group(&self, id: GroupId, name: &str) {
        self.groups.lock().unwrap().push(Group {
            id,
            name: name.to_string(),
            order: None,
        });
    }

    pub fn seed_session(&self, id: SessionId, title: &str, group_id: Option<GroupId>, order: i64) {
        self.sessions.lock().unwrap().push(Session {
            id,
            title: title.to_string(),
            group_id,
            order,
            created_at: None,
        });
    }

    pub fn seed_messages(&self, id: SessionId, messages: Vec<Message>) {
        self.messages.lock().unwrap().insert(id, messages);
    }

    pub fn remove_group(&self, id: GroupId) {
        self.groups.lock().unwrap().retain(|g| g.id != id);
    }

    pub fn remove_session(&self, id: SessionId) {
        self.sessions.lock().unwrap().retain(|s| s.id != id);
    }

    /// Makes every subsequent sessions fetch fail.
    pub fn fail_sessions_fetch(&self) {
        self.fail_sessions_fetch.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent chat turn fail.
    pub fn fail_chat(&self) {
        self.fail_chat.store(true, Ordering::SeqCst);
    }

    pub fn set_chat_reply(&self, reply: &str) {
        *self.chat_reply.lock().unwrap() = reply.to_string();
    }

    /// Holds chat turns open until the returned gate is notified.
    pub fn gate_chat(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.chat_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    pub fn renames(&self) -> Vec<(SessionId, String)> {
        self.session_renames.lock().unwrap().clone()
    }

    pub fn moves(&self) -> Vec<(SessionId, Option<GroupId>, i64)> {
        self.moves.lock().unwrap().clone()
    }

    pub fn chat_requests(&self) -> Vec<(SessionId, String)> {
        self.chat_requests.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    fn alloc_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn backend_error() -> LanternError {
        LanternError::gateway(500, "internal error")
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        self.record("list_groups");
        Ok(self.groups.lock().unwrap().clone())
    }

    async fn create_group(&self, name: &str) -> Result<Group> {
        self.record("create_group");
        let group = Group {
            id: self.alloc_id(),
            name: name.to_string(),
            order: None,
        };
        self.groups.lock().unwrap().push(group.clone());
        Ok(group)
    }

    async fn rename_group(&self, id: GroupId, name: &str) -> Result<Group> {
        self.record("rename_group");
        let mut groups = self.groups.lock().unwrap();
        let group = groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| LanternError::not_found("group", id))?;
        group.name = name.to_string();
        Ok(group.clone())
    }

    async fn delete_group(&self, id: GroupId) -> Result<()> {
        self.record("delete_group");
        self.groups.lock().unwrap().retain(|g| g.id != id);
        // The backend reassigns orphaned sessions to uncategorized
        for session in self.sessions.lock().unwrap().iter_mut() {
            if session.group_id == Some(id) {
                session.group_id = None;
            }
        }
        Ok(())
    }

    async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.record("list_sessions");
        if self.fail_sessions_fetch.load(Ordering::SeqCst) {
            return Err(Self::backend_error());
        }
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn create_session(&self, title: &str, bucket: Bucket) -> Result<Session> {
        self.record("create_session");
        let session = Session {
            id: self.alloc_id(),
            title: title.to_string(),
            group_id: bucket.group_id(),
            order: 0,
            created_at: None,
        };
        self.sessions.lock().unwrap().push(session.clone());
        self.messages.lock().unwrap().insert(session.id, Vec::new());
        Ok(session)
    }

    async fn rename_session(&self, id: SessionId, title: &str) -> Result<Session> {
        self.record("rename_session");
        self.session_renames
            .lock()
            .unwrap()
            .push((id, title.to_string()));
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| LanternError::not_found("session", id))?;
        session.title = title.to_string();
        Ok(session.clone())
    }

    async fn move_session(&self, id: SessionId, placement: Placement) -> Result<Session> {
        self.record("move_session");
        self.moves
            .lock()
            .unwrap()
            .push((id, placement.bucket.group_id(), placement.order));
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| LanternError::not_found("session", id))?;
        session.group_id = placement.bucket.group_id();
        session.order = placement.order;
        Ok(session.clone())
    }

    async fn delete_session(&self, id: SessionId) -> Result<()> {
        self.record("delete_session");
        self.sessions.lock().unwrap().retain(|s| s.id != id);
        self.messages.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn list_messages(&self, session_id: SessionId) -> Result<Vec<Message>> {
        self.record("list_messages");
        Ok(self
            .messages
            .lock()
            .unwrap()
            .get(&session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_chat(&self, session_id: SessionId, content: &str) -> Result<Message> {
        self.record("send_chat");
        self.chat_requests
            .lock()
            .unwrap()
            .push((session_id, content.to_string()));

        let gate = self.chat_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.fail_chat.load(Ordering::SeqCst) {
            return Err(Self::backend_error());
        }
        Ok(Message::assistant(self.chat_reply.lock().unwrap().clone()))
    }

    async fn status(&self) -> Result<BackendStatus> {
        self.record("status");
        Ok(BackendStatus {
            status: "running".to_string(),
            model_loaded: true,
            device: "cpu".to_string(),
        })
    }
}

/// Confirmation prompt that always answers the same way.
pub struct AutoConfirm {
    accept: bool,
}

impl AutoConfirm {
    pub fn accepting() -> Self {
        Self { accept: true }
    }

    pub fn declining() -> Self {
        Self { accept: false }
    }
}

#[async_trait]
impl ConfirmPrompt for AutoConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        self.accept
    }
}

/// Clipboard that stores the last written text in memory.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}
