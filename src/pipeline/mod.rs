//! Per-event orchestration: filter, classify, resolve, record, reply.

use crate::classify;
use crate::line::{ChatClient, LineError};
use crate::models::MessageEvent;
use crate::services::notifier::{self, Notifier};
use crate::sheets::PredictionStore;

/// Sent when the sender has not friended the bot, so their profile
/// (and display name) cannot be fetched.
const FRIEND_PROMPT: &str =
    "予想を記録するには、まず本アカウントを友だち追加してください！";

/// Handle one inbound message event end to end.
///
/// Never returns an error: anything unexpected past the classification
/// step is routed to the operator channel and the event is dropped.
/// The sender gets no reply in that failure path — a wrong reply is
/// worse than silence, and the operator follows up by hand.
pub async fn handle_event<C, S>(
    event: &MessageEvent,
    target_group_id: &str,
    chat: &C,
    store: &S,
    notifier: Option<&Notifier>,
) where
    C: ChatClient + Sync,
    S: PredictionStore + Sync,
{
    if let Err(e) = run(event, target_group_id, chat, store).await {
        tracing::error!(error = %e, user = %event.user_id, "message pipeline failed");
        if let Some(n) = notifier {
            n.notify(&notifier::format_pipeline_alert(&e)).await;
        }
    }
}

async fn run<C, S>(
    event: &MessageEvent,
    target_group_id: &str,
    chat: &C,
    store: &S,
) -> anyhow::Result<()>
where
    C: ChatClient + Sync,
    S: PredictionStore + Sync,
{
    // Step 1: only the configured group is watched.
    if event.group_id != target_group_id {
        tracing::debug!(group = %event.group_id, "event from another group, ignoring");
        return Ok(());
    }

    // Step 2: cheap shape check before any API call. The group mostly
    // carries unrelated chatter; non-predictions get no reply at all.
    let token = classify::normalize(&event.text);
    if !classify::is_prediction(&token) {
        return Ok(());
    }

    // Step 3: profile lookup doubles as the friend check.
    let profile = match chat.get_profile(&event.user_id).await {
        Ok(p) => p,
        Err(LineError::ProfileNotFound(_)) => {
            chat.reply(&event.reply_token, FRIEND_PROMPT).await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // Step 4: the backend decides which race this token belongs to.
    let race = store.record_prediction(&event.user_id, &token).await?;

    // Step 5: tell the sender which race their prediction was filed
    // under, or nobody can tell whether the right one was hit.
    let ack = format!(
        "{}さんの予想「{}」を {} {} の予想として記録しました！",
        profile.display_name,
        event.text.trim(),
        race.race_date,
        race.race_name,
    );
    chat.reply(&event.reply_token, &ack).await?;

    tracing::info!(
        user = %profile.display_name,
        race = %race.race_name,
        token = %token,
        "prediction recorded"
    );
    Ok(())
}
