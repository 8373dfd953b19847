//! Spreadsheet backend wrapper.
//!
//! The backend (an Apps Script web app in front of the prediction
//! sheet) owns the mapping from a prediction token to a concrete race.
//! This client only forwards the prediction and reports back what the
//! backend resolved.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::models::RecordedRace;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("spreadsheet endpoint returned status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait PredictionStore {
    /// Record one normalized prediction token for a sender. Returns
    /// the race the backend filed it under.
    async fn record_prediction(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<RecordedRace, SheetsError>;
}

#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: Client,
    endpoint: String,
}

impl SheetsClient {
    pub fn new(http: Client, endpoint: String) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl PredictionStore for SheetsClient {
    async fn record_prediction(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<RecordedRace, SheetsError> {
        let body = json!({
            "userId": user_id,
            "prediction": token,
        });
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api { status, body });
        }

        Ok(resp.json().await?)
    }
}
