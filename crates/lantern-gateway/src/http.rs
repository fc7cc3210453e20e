//! HTTP implementation of the backend gateway.
//!
//! Talks to the locally hosted chat backend over its JSON REST API. Every
//! trait method is one request/response pair; failures map onto the shared
//! error taxonomy and are never retried here.

use async_trait::async_trait;
use lantern_core::error::{LanternError, Result};
use lantern_core::gateway::ChatGateway;
use lantern_core::model::{BackendStatus, Bucket, Group, GroupId, Message, Session, SessionId};
use lantern_core::ordering::Placement;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::GatewayConfig;

/// Gateway implementation backed by the backend's HTTP API.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a gateway from connection settings.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the HTTP client cannot be constructed.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| LanternError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a gateway against a specific base URL with default settings.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.client.patch(self.url(path)).json(body).send().await?;
        decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self.client.delete(self.url(path)).send().await?;
        check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for HttpGateway {
    async fn list_groups(&self) -> Result<Vec<Group>> {
        self.get_json("/groups").await
    }

    async fn create_group(&self, name: &str) -> Result<Group> {
        self.post_json("/groups", &CreateGroupRequest { name }).await
    }

    async fn rename_group(&self, id: GroupId, name: &str) -> Result<Group> {
        self.patch_json(&format!("/groups/{id}"), &RenameGroupRequest { name })
            .await
    }

    async fn delete_group(&self, id: GroupId) -> Result<()> {
        self.delete(&format!("/groups/{id}")).await
    }

    async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.get_json("/sessions").await
    }

    async fn create_session(&self, title: &str, bucket: Bucket) -> Result<Session> {
        self.post_json(
            "/sessions",
            &CreateSessionRequest {
                title,
                group_id: bucket.group_id(),
            },
        )
        .await
    }

    async fn rename_session(&self, id: SessionId, title: &str) -> Result<Session> {
        self.patch_json(&format!("/sessions/{id}"), &RenameSessionRequest { title })
            .await
    }

    async fn move_session(&self, id: SessionId, placement: Placement) -> Result<Session> {
        self.patch_json(
            &format!("/sessions/{id}/move"),
            &MoveSessionRequest {
                group_id: placement.bucket.group_id(),
                order: placement.order,
            },
        )
        .await
    }

    async fn delete_session(&self, id: SessionId) -> Result<()> {
        self.delete(&format!("/sessions/{id}")).await
    }

    async fn list_messages(&self, session_id: SessionId) -> Result<Vec<Message>> {
        self.get_json(&format!("/sessions/{session_id}/messages"))
            .await
    }

    async fn send_chat(&self, session_id: SessionId, content: &str) -> Result<Message> {
        self.post_json(
            "/chat",
            &ChatRequest {
                session_id,
                content,
            },
        )
        .await
    }

    async fn status(&self) -> Result<BackendStatus> {
        self.get_json("/status").await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check(response).await?;
    Ok(response.json().await?)
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read backend error body".to_string());
    warn!(status = status.as_u16(), "backend request failed");
    Err(map_http_error(status, body))
}

fn map_http_error(status: StatusCode, body: String) -> LanternError {
    // FastAPI-style backends wrap error messages as {"detail": "..."}
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|wrapper| wrapper.detail)
        .unwrap_or(body);

    LanternError::gateway(status.as_u16(), message)
}

#[derive(Serialize)]
struct CreateGroupRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct RenameGroupRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    title: &'a str,
    group_id: Option<GroupId>,
}

#[derive(Serialize)]
struct RenameSessionRequest<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct MoveSessionRequest {
    group_id: Option<GroupId>,
    order: i64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    session_id: SessionId,
    content: &'a str,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: String,
}
