use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // LINE Messaging API credentials
    pub channel_access_token: String,
    pub channel_secret: String,

    /// The one group chat whose messages are watched for predictions.
    pub target_group_id: String,

    /// Spreadsheet backend (Apps Script web app) endpoint.
    pub sheets_endpoint: String,

    /// LINE user id that receives operator alerts. Optional — without
    /// it, pipeline failures only reach the logs.
    pub operator_user_id: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            channel_access_token: required("LINE_CHANNEL_ACCESS_TOKEN")?,
            channel_secret: required("LINE_CHANNEL_SECRET")?,
            target_group_id: required("TARGET_GROUP_ID")?,
            sheets_endpoint: required("SHEETS_ENDPOINT")?,
            operator_user_id: env::var("OPERATOR_USER_ID")
                .ok()
                .filter(|v| !v.is_empty()),
        })
    }
}

// CI runners export unset secrets as empty strings, so emptiness is
// rejected the same as absence.
fn required(key: &str) -> anyhow::Result<String> {
    let value = env::var(key).map_err(|_| anyhow::anyhow!("{key} must be set"))?;
    if value.is_empty() {
        anyhow::bail!("{key} is empty");
    }
    Ok(value)
}
