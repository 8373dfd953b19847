use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MessageEvent — core pipeline message
// ---------------------------------------------------------------------------

/// One inbound text message, already unwrapped from the webhook
/// envelope. The reply token is single-use and only valid while this
/// event is being handled.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub group_id: String,
    pub user_id: String,
    pub reply_token: String,
    pub text: String,
}

// ---------------------------------------------------------------------------
// UserProfile
// ---------------------------------------------------------------------------

/// LINE user profile as returned by the profile endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: String,
    pub user_id: String,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}

// ---------------------------------------------------------------------------
// PayoutRecord
// ---------------------------------------------------------------------------

/// Marks a ranking slot with no finisher recorded.
pub const NO_RANKING: i32 = -1;

/// Payout amounts (yen) and top-three finishers for one race.
///
/// All three ranking slots are always present; a slot with no finisher
/// holds [`NO_RANKING`] rather than being omitted, so consumers can
/// read three positional fields unconditionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayoutRecord {
    pub win: i64,
    pub quinella: i64,
    pub exacta: i64,
    pub trio: i64,
    pub trifecta: i64,
    pub ranking1: i32,
    pub ranking2: i32,
    pub ranking3: i32,
}

// ---------------------------------------------------------------------------
// RecordedRace
// ---------------------------------------------------------------------------

/// What the spreadsheet backend resolved a prediction into. The
/// backend owns the token-to-race mapping; we only report its answer
/// back to the sender.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedRace {
    pub race_date: String,
    pub race_name: String,
}
