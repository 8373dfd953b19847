//! LINE webhook endpoint.
//!
//! Verifies the request signature against the raw body, decodes the
//! webhook envelope, and feeds each group text message to the
//! pipeline. The pipeline never raises, so the endpoint answers OK to
//! LINE whenever the signature and envelope were sound.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Deserialize;

use super::signature;
use crate::errors::AppError;
use crate::models::MessageEvent;
use crate::pipeline;
use crate::AppState;

/// Webhook envelope, trimmed to the fields the pipeline consumes.
#[derive(Debug, Deserialize)]
struct WebhookBody {
    #[serde(default)]
    events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    reply_token: Option<String>,
    #[serde(default)]
    source: Option<EventSource>,
    #[serde(default)]
    message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventSource {
    #[serde(default)]
    group_id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventMessage {
    #[serde(rename = "type")]
    message_type: String,
    #[serde(default)]
    text: Option<String>,
}

pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("missing X-Line-Signature".into()))?;

    if !signature::verify(&state.config.channel_secret, &body, signature) {
        return Err(AppError::BadRequest("signature mismatch".into()));
    }

    let parsed: WebhookBody = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("undecodable webhook body: {e}")))?;

    for event in parsed.events {
        let Some(event) = into_message_event(event) else {
            continue;
        };
        pipeline::handle_event(
            &event,
            &state.config.target_group_id,
            &state.line,
            &state.sheets,
            state.notifier.as_deref(),
        )
        .await;
    }

    Ok("OK")
}

/// Only group text messages feed the pipeline; stickers, joins, and
/// 1:1 chats are dropped here.
fn into_message_event(event: WebhookEvent) -> Option<MessageEvent> {
    if event.event_type != "message" {
        return None;
    }
    let message = event.message?;
    if message.message_type != "text" {
        return None;
    }
    let source = event.source?;
    Some(MessageEvent {
        group_id: source.group_id?,
        user_id: source.user_id?,
        reply_token: event.reply_token?,
        text: message.text?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn text_event(json: &str) -> WebhookEvent {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_group_text_message_is_unwrapped() {
        let event = text_event(
            r#"{
                "type": "message",
                "message": { "type": "text", "id": "13930066619344", "text": "2021.09.02.06.21" },
                "timestamp": 1619087553397,
                "source": { "type": "group", "groupId": "C19709b8f8", "userId": "U226ec6476abd" },
                "replyToken": "f5bf4ee22dd5",
                "mode": "active"
            }"#,
        );
        let message = into_message_event(event).unwrap();
        assert_eq!(message.group_id, "C19709b8f8");
        assert_eq!(message.user_id, "U226ec6476abd");
        assert_eq!(message.reply_token, "f5bf4ee22dd5");
        assert_eq!(message.text, "2021.09.02.06.21");
    }

    #[test]
    fn test_non_text_message_is_dropped() {
        let event = text_event(
            r#"{
                "type": "message",
                "message": { "type": "sticker" },
                "source": { "type": "group", "groupId": "C1", "userId": "U1" },
                "replyToken": "t"
            }"#,
        );
        assert!(into_message_event(event).is_none());
    }

    #[test]
    fn test_one_to_one_chat_is_dropped() {
        // no groupId in the source
        let event = text_event(
            r#"{
                "type": "message",
                "message": { "type": "text", "text": "hello" },
                "source": { "type": "user", "userId": "U1" },
                "replyToken": "t"
            }"#,
        );
        assert!(into_message_event(event).is_none());
    }

    #[test]
    fn test_non_message_event_is_dropped() {
        let event = text_event(r#"{ "type": "join", "replyToken": "t" }"#);
        assert!(into_message_event(event).is_none());
    }
}
