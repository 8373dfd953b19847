//! Operator escalation. Failures here are logged and swallowed; a
//! broken escalation channel must not take the webhook down with it.

use crate::line::LineClient;

/// Delivers operator alerts as LINE push messages to the configured
/// operator account.
#[derive(Debug, Clone)]
pub struct Notifier {
    line: LineClient,
    operator_user_id: String,
}

impl Notifier {
    pub fn new(line: LineClient, operator_user_id: String) -> Self {
        Self {
            line,
            operator_user_id,
        }
    }

    /// Best effort. Failures are logged as warnings.
    pub async fn notify(&self, message: &str) {
        if let Err(e) = self.line.push(&self.operator_user_id, message).await {
            tracing::warn!(error = %e, "failed to deliver operator alert");
        }
    }
}

/// Format an escalation for an unexpected pipeline failure. The event
/// is dropped once this goes out, so the operator follows up by hand.
pub fn format_pipeline_alert(error: &anyhow::Error) -> String {
    format!(
        "予想Botでエラーが発生しました。\n{error:#}\n詳細はサーバのログを確認してください。"
    )
}
