//! LINE Messaging API client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::models::UserProfile;

const API_BASE: &str = "https://api.line.me/v2/bot";

#[derive(Debug, Error)]
pub enum LineError {
    /// The user has not friended the bot account, so the profile
    /// endpoint answers 404. A normal user state with a scripted
    /// remedy, not a fault.
    #[error("no profile for user {0}; not friended with the bot")]
    ProfileNotFound(String),

    #[error("LINE API returned status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// What the message pipeline needs from the chat platform. A reply
/// token is single-use; callers reply at most once per event.
#[async_trait]
pub trait ChatClient {
    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, LineError>;
    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), LineError>;
}

#[derive(Debug, Clone)]
pub struct LineClient {
    http: Client,
    access_token: String,
}

impl LineClient {
    pub fn new(http: Client, access_token: String) -> Self {
        Self { http, access_token }
    }

    /// Push a message outside a reply context, e.g. operator alerts.
    pub async fn push(&self, to: &str, text: &str) -> Result<(), LineError> {
        let body = json!({
            "to": to,
            "messages": [{ "type": "text", "text": text }],
        });
        let resp = self
            .http
            .post(format!("{API_BASE}/message/push"))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check(resp).await
    }

    async fn check(resp: reqwest::Response) -> Result<(), LineError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(LineError::Api { status, body })
    }
}

#[async_trait]
impl ChatClient for LineClient {
    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, LineError> {
        let resp = self
            .http
            .get(format!("{API_BASE}/profile/{user_id}"))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(LineError::ProfileNotFound(user_id.to_string()));
        }
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LineError::Api { status, body });
        }

        Ok(resp.json().await?)
    }

    async fn reply(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        let body = json!({
            "replyToken": reply_token,
            "messages": [{ "type": "text", "text": text }],
        });
        let resp = self
            .http
            .post(format!("{API_BASE}/message/reply"))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check(resp).await
    }
}
